//! Tabulation of predictions and fitted models for console output.

use stanza::style::{HAlign, Header, MinWidth, Separator, Styles};
use stanza::table::{Col, Row, Table};

use crate::domain::Outcome;
use crate::linear::matrix::Matrix;
use crate::model::{FittedModel, Regressor};
use crate::predict::Prediction;

pub fn tabulate_predictions(predictions: &[Prediction]) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(12)).with(HAlign::Left)),
            Col::new(Styles::default().with(MinWidth(12)).with(HAlign::Left)),
            Col::new(Styles::default().with(MinWidth(11)).with(HAlign::Centred)),
            Col::new(Styles::default().with(MinWidth(7)).with(HAlign::Centred)),
            Col::new(Styles::default().with(MinWidth(9)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(9)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(9)).with(HAlign::Right)),
        ])
        .with_row({
            let mut header_cells = vec![
                "Home".into(),
                "Away".into(),
                "xG".into(),
                "Score".into(),
            ];
            for outcome in Outcome::ALL {
                header_cells.push(outcome.to_string().into());
            }
            Row::new(
                Styles::default().with(Header(true)).with(Separator(true)),
                header_cells,
            )
        });
    for prediction in predictions {
        let mut cells = vec![
            prediction.home_team.clone().into(),
            prediction.away_team.clone().into(),
            format!(
                "{:.2}:{:.2}",
                prediction.home_goals_expected, prediction.away_goals_expected
            )
            .into(),
            prediction.rounded_score().to_string().into(),
        ];
        for outcome in Outcome::ALL {
            cells.push(format!("{}%", prediction.pct(&outcome)).into());
        }
        table.push_row(Row::new(Styles::default(), cells));
    }
    table
}

/// Scoreline probabilities with home goals down the rows and away goals across the columns.
pub fn tabulate_scoregrid(scoregrid: &Matrix<f64>) -> Table {
    let mut table = Table::default()
        .with_cols({
            let mut cols = vec![Col::new(
                Styles::default()
                    .with(Separator(true))
                    .with(MinWidth(5))
                    .with(HAlign::Centred),
            )];
            for _ in 0..scoregrid.cols() {
                cols.push(Col::new(
                    Styles::default().with(MinWidth(8)).with(HAlign::Right),
                ));
            }
            cols
        })
        .with_row({
            let mut header_cells = vec!["H \\ A".into()];
            for away_goals in 0..scoregrid.cols() {
                header_cells.push(away_goals.to_string().into());
            }
            Row::new(
                Styles::default().with(Header(true)).with(Separator(true)),
                header_cells,
            )
        });
    for (home_goals, probs) in scoregrid.into_iter().enumerate() {
        let mut cells = vec![home_goals.to_string().into()];
        for prob in probs {
            cells.push(format!("{prob:.4}").into());
        }
        table.push_row(Row::new(Styles::default(), cells));
    }
    table
}

pub fn tabulate_coefficients(model: &FittedModel) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(20)).with(HAlign::Left)),
            Col::new(Styles::default().with(MinWidth(12)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(9)).with(HAlign::Left)),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)).with(Separator(true)),
            vec!["Regressor".into(), "Coefficient".into(), "".into()],
        ));
    for (col, regressor) in model.regressors().iter().enumerate() {
        let marker = if model.is_aliased(col) { "(aliased)" } else { "" };
        table.push_row(Row::new(
            Styles::default(),
            vec![
                model.label(regressor).to_string().into(),
                format!("{:.6}", model.coefficients()[col]).into(),
                marker.into(),
            ],
        ));
    }
    table
}

/// Each team with its attack and defence coefficients. The reference team's are zero.
pub fn tabulate_teams(model: &FittedModel) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(5)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(20)).with(HAlign::Left)),
            Col::new(Styles::default().with(MinWidth(10)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(10)).with(HAlign::Right)),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)).with(Separator(true)),
            vec!["#".into(), "Team".into(), "Attack".into(), "Defence".into()],
        ));
    for (index, team) in model.teams().names().iter().enumerate() {
        let attack = model.coefficient(Regressor::Team(index)).unwrap_or_default();
        let defence = model.coefficient(Regressor::Opponent(index)).unwrap_or_default();
        table.push_row(Row::new(
            Styles::default(),
            vec![
                index.to_string().into(),
                team.clone().into(),
                format!("{attack:.4}").into(),
                format!("{defence:.4}").into(),
            ],
        ));
    }
    table
}
