//! Integration tests for the power model with real-world riding scenarios
//!
//! These exercise the public API end to end: building a ride, breaking
//! power down into components, inverting it with the solver and resolving
//! command line input.

use std::time::Duration;

use velocalc::cli::{CalcArgs, Outcome};
use velocalc::config::Profile;
use velocalc::formulas::{air_density, altitude_adjust, estimated_cda};
use velocalc::{
    approx_eq, approx_equal, distance_for_duration, duration_for_distance, solve_velocity,
    Acceleration, PhysicalConstants, Position, Posture, PowerComponents, Ride, Wind,
    SOLVER_EPSILON,
};

fn create_climb_ride() -> Ride {
    Ride {
        rho: 1.225,
        cda: Position::Drops.cda(),
        crr: 0.004,
        gradient: 0.08125,
        total_mass: 75.0,
        ..Default::default()
    }
}

#[test]
fn test_hill_climb_time_for_power() {
    // Scenario: 4.8 km at 8.1% average, 75 kg system, 389.9 W in the drops
    let c = PhysicalConstants::default();
    let ride = create_climb_ride();

    let solution = solve_velocity(389.9, &ride, &c);
    assert!(solution.converged);
    assert!(approx_eq(solution.velocity, 5.55));

    let seconds = duration_for_distance(389.9, 4800.0, &ride, &c);
    assert!(approx_eq(seconds, 864.865));
    assert!(approx_eq(distance_for_duration(389.9, seconds, &ride, &c), 4800.0));
}

#[test]
fn test_breakdown_reproduces_solved_power() {
    let c = PhysicalConstants::default();
    let ride = create_climb_ride();

    let solution = solve_velocity(389.9, &ride, &c);
    let vg = solution.velocity;
    let comp = PowerComponents::new(
        &ride,
        vg,
        ride.air_velocity(vg),
        &Acceleration::steady(vg, 4800.0 / vg),
        &c,
    );

    assert!(approx_equal(comp.total(), 389.9, SOLVER_EPSILON));
    // On an 8% climb, gravity dominates.
    assert!(comp.potential_energy > comp.aerodynamic);
    assert!(comp.potential_energy > comp.rolling_resistance);
    assert_eq!(comp.kinetic_energy, 0.0);
}

#[test]
fn test_altitude_ride() {
    // Same effort at 1000 m: thinner air, slightly less sustainable power
    let c = PhysicalConstants::default();
    let sea_level = Ride {
        gradient: 0.0,
        ..create_climb_ride()
    };
    let altitude = Ride {
        rho: air_density(1000.0, c.gravity, &c),
        ..sea_level
    };

    assert!(approx_eq(altitude.rho, 1.111));

    let power = altitude_adjust(300.0, 1000.0);
    assert!(power < 300.0);
    let v_sea = solve_velocity(300.0, &sea_level, &c).velocity;
    let v_alt = solve_velocity(300.0, &altitude, &c).velocity;
    assert!(v_alt > v_sea, "thinner air should be faster at equal power");
}

#[test]
fn test_crosswind_and_estimated_cda() {
    let c = PhysicalConstants::default();
    let cda = estimated_cda(Posture::Aero, 1.75, 69.0);
    assert!(approx_eq(cda, 0.2284));

    let calm = Ride {
        cda,
        gradient: 0.0,
        total_mass: 77.0,
        ..Default::default()
    };
    let crosswind = Ride {
        wind: Wind {
            speed: 6.0,
            direction: 90.0,
        },
        heading: 0.0,
        ..calm
    };

    // A pure crosswind leaves the air velocity along the road unchanged.
    let v_calm = solve_velocity(250.0, &calm, &c).velocity;
    let v_cross = solve_velocity(250.0, &crosswind, &c).velocity;
    assert!(approx_eq(v_calm, v_cross));
}

#[test]
fn test_custom_constants_flow_through() {
    let ride = create_climb_ride();
    let lossless = PhysicalConstants {
        drive_chain_efficiency: 1.0,
        ..Default::default()
    };
    let default = PhysicalConstants::default();

    let p_lossless = ride.power_at(6.0, &lossless);
    let p_default = ride.power_at(6.0, &default);
    assert!(approx_equal(p_default * 0.976, p_lossless, 1e-9));
}

#[test]
fn test_cli_round_trip() {
    let profile = Profile::default();
    let by_power = CalcArgs {
        distance: 4800.0,
        position: Some(Position::Drops),
        gr: 8.125,
        power: Some(389.9),
        ..Default::default()
    };
    let calc = by_power.resolve(&profile).unwrap();
    let seconds = match calc.run() {
        Outcome::Duration { seconds, .. } => seconds,
        other => panic!("unexpected outcome {:?}", other),
    };

    let by_duration = CalcArgs {
        power: None,
        duration: Some(Duration::from_secs_f64(seconds)),
        ..by_power
    };
    let calc = by_duration.resolve(&profile).unwrap();
    match calc.run() {
        Outcome::Power { total, .. } => assert!(approx_equal(total, 389.9, 1e-6)),
        other => panic!("unexpected outcome {:?}", other),
    }
}

#[test]
fn test_outcome_serializes_to_json() {
    let args = CalcArgs {
        distance: 40_000.0,
        duration: Some(Duration::from_secs(3600)),
        ..Default::default()
    };
    let calc = args.resolve(&Profile::default()).unwrap();
    let json = serde_json::to_value(calc.run()).unwrap();

    assert_eq!(json["solved_for"], "power");
    assert!(json["components"]["aerodynamic"].as_f64().unwrap() > 0.0);
    assert_eq!(json["components"]["kinetic_energy"].as_f64().unwrap(), 0.0);
}
