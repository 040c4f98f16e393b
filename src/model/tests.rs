use assert_float_eq::*;

use crate::data::reshape;
use crate::domain::MatchRecord;
use crate::testing::assert_slice_f64_relative;

use super::*;

const EPSILON: f64 = 1e-6;

fn fit(matches: &[MatchRecord]) -> FittedModel {
    fit_model(&reshape(matches).unwrap(), &FitOptions::default()).unwrap()
}

fn round_robin() -> Vec<MatchRecord> {
    vec![
        MatchRecord::new("A", "B", 2, 1),
        MatchRecord::new("A", "C", 3, 0),
        MatchRecord::new("B", "A", 1, 1),
        MatchRecord::new("B", "C", 2, 2),
        MatchRecord::new("C", "A", 0, 2),
        MatchRecord::new("C", "B", 1, 0),
    ]
}

/// TeamA beats TeamB 2:0 at home twice and loses 0:1 away twice.
fn one_sided() -> Vec<MatchRecord> {
    vec![
        MatchRecord::new("TeamA", "TeamB", 2, 0),
        MatchRecord::new("TeamA", "TeamB", 2, 0),
        MatchRecord::new("TeamB", "TeamA", 1, 0),
        MatchRecord::new("TeamB", "TeamA", 1, 0),
    ]
}

#[test]
fn empty_table_is_insufficient() {
    let table = reshape(&[]).unwrap();
    let err = fit_model(&table, &FitOptions::default()).unwrap_err();
    assert!(matches!(err, FitError::InsufficientData), "{err:?}");
}

#[test]
fn team_index_is_sorted_union() {
    let table = reshape(&[
        MatchRecord::new("Wolves", "Arsenal", 0, 2),
        MatchRecord::new("Chelsea", "Wolves", 1, 1),
    ])
    .unwrap();
    let teams = TeamIndex::from_table(&table);
    assert_eq!(&["Arsenal", "Chelsea", "Wolves"], teams.names());
    assert_eq!(3, teams.len());
    assert_eq!(Ok(1), teams.index_of("Chelsea"));
    assert_eq!("Wolves", teams.name(2));
    assert!(teams.contains("Arsenal"));
    assert_eq!(Err(UnknownTeamError("Barcelona".into())), teams.index_of("Barcelona"));
}

#[test]
fn regressor_layout() {
    let model = fit(&round_robin());
    assert_eq!(
        &[
            Regressor::Intercept,
            Regressor::Team(1),
            Regressor::Team(2),
            Regressor::Opponent(1),
            Regressor::Opponent(2),
            Regressor::Home
        ],
        model.regressors()
    );
    let labels = model
        .regressors()
        .iter()
        .map(|regressor| model.label(regressor).to_string())
        .collect::<Vec<_>>();
    assert_eq!(
        vec!["Intercept", "team[B]", "team[C]", "opponent[B]", "opponent[C]", "home"],
        labels
    );
}

#[test]
fn round_robin_coefficients() {
    let model = fit(&round_robin());
    assert_slice_f64_relative(
        &[
            -0.44260024622902294,
            -0.3589779396130007,
            -0.6032879087095568,
            0.8817448465910694,
            0.9425390624442226,
            0.40546510810816416,
        ],
        model.coefficients(),
        EPSILON,
    );
    assert_float_relative_eq!(6.3767299977409175, model.deviance(), EPSILON);
    assert_float_relative_eq!(10.987722081541493, model.null_deviance(), EPSILON);
    assert_eq!(12, model.observations());
    assert_eq!(6, model.residual_degrees_of_freedom());
    assert!((0..model.regressors().len()).all(|col| !model.is_aliased(col)));
    assert_float_relative_eq!(
        1.5f64.ln(),
        model.coefficient(Regressor::Home).unwrap(),
        EPSILON
    );
    assert_eq!(None, model.coefficient(Regressor::Team(3)));
}

#[test]
fn round_robin_expectations() {
    let model = fit(&round_robin());
    assert_float_relative_eq!(
        2.4729305981679,
        model.expectation("A", "C", Side::Home).unwrap(),
        EPSILON
    );
    assert_float_relative_eq!(
        0.3513796012214006,
        model.expectation("C", "A", Side::Away).unwrap(),
        EPSILON
    );
    // home advantage is a constant multiplier
    let home = model.expectation("B", "C", Side::Home).unwrap();
    let away = model.expectation("B", "C", Side::Away).unwrap();
    assert_float_relative_eq!(1.5, home / away, EPSILON);
}

#[test]
fn unknown_team() {
    let model = fit(&round_robin());
    assert_eq!(
        Err(UnknownTeamError("Barcelona".into())),
        model.expectation("Barcelona", "A", Side::Home)
    );
    assert_eq!(
        Err(UnknownTeamError("Barcelona".into())),
        model.expectation("A", "Barcelona", Side::Away)
    );
}

#[test]
fn one_sided_favours_home_side() {
    let model = fit(&one_sided());
    // with two teams, the opponent dummy is the complement of the team dummy
    assert!(model.is_aliased(2));
    assert_eq!(0.0, model.coefficient(Regressor::Opponent(1)).unwrap());

    let home_goals = model.expectation("TeamA", "TeamB", Side::Home).unwrap();
    let away_goals = model.expectation("TeamB", "TeamA", Side::Away).unwrap();
    assert_float_relative_eq!(2.0, home_goals, EPSILON);
    assert!(away_goals > 0.0 && away_goals < 1e-6, "away_goals: {away_goals}");
    assert_float_relative_eq!(
        1.0,
        model.expectation("TeamB", "TeamA", Side::Home).unwrap(),
        EPSILON
    );
}

#[test]
fn non_convergence_is_a_fit_error() {
    let table = reshape(&round_robin()).unwrap();
    let options = FitOptions {
        max_iterations: 1,
        ..FitOptions::default()
    };
    let err = fit_model(&table, &options).unwrap_err();
    assert!(
        matches!(err, FitError::ModelFit(ModelFitError::NonConvergence { .. })),
        "{err:?}"
    );
}

#[test]
fn goalless_season_is_a_fit_error() {
    let table = reshape(&[
        MatchRecord::new("A", "B", 0, 0),
        MatchRecord::new("B", "A", 0, 0),
    ])
    .unwrap();
    let err = fit_model(&table, &FitOptions::default()).unwrap_err();
    assert!(matches!(err, FitError::ModelFit(ModelFitError::ZeroResponse)), "{err:?}");
}
