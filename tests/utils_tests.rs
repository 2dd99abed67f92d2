//! Unit tests for the reporting helpers.

use geo_cvrp::distance::DistanceMatrix;
use geo_cvrp::extract::SolutionExtractor;
use geo_cvrp::problem::{Fleet, RoutingProblem};
use geo_cvrp::solution::Assignment;
use geo_cvrp::utils::{format_duration, write_solution, SearchStatistics};
use std::time::Duration;

fn create_line_problem() -> RoutingProblem {
    let matrix = DistanceMatrix::from_rows(vec![
        vec![0, 100, 200],
        vec![100, 0, 100],
        vec![200, 100, 0],
    ])
    .unwrap();
    RoutingProblem::new(
        matrix,
        Fleet::with_capacities(vec![5, 5]).unwrap(),
        Some(vec![0, 2, 3]),
        Duration::from_secs(1),
    )
    .unwrap()
}

#[test]
fn test_format_duration() {
    assert_eq!(format_duration(Duration::from_secs(0)), "0h 00m 00.000s");
    assert_eq!(format_duration(Duration::from_millis(1500)), "0h 00m 01.500s");
    assert_eq!(format_duration(Duration::from_secs(3725)), "1h 02m 05.000s");
}

#[test]
fn test_write_solution_with_labels() {
    let problem = create_line_problem();
    let mut assignment = Assignment::empty(&problem);
    assignment.routes[0].customers = vec![1, 2];
    assignment.unassigned.clear();
    assignment.evaluate(&problem);
    let solution = SolutionExtractor::extract(&problem, &assignment, true);

    let labels = vec!["hub".to_string(), "north".to_string(), "south".to_string()];
    let mut out = Vec::new();
    write_solution(&mut out, &solution, &problem, Some(labels.as_slice())).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains("Success: true"));
    assert!(text.contains("Total Distance: 400m"));
    assert!(text.contains("Vehicle #0: hub -> north -> south -> hub"));
    assert!(text.contains("Load: 5 / 5"));
    assert!(text.contains("Vehicle #1: Idle"));
    assert!(!text.contains("Unvisited"));
}

#[test]
fn test_write_solution_falls_back_to_indices() {
    let problem = create_line_problem();
    let mut assignment = Assignment::empty(&problem);
    assignment.routes[1].customers = vec![2];
    assignment.unassigned = vec![1];
    assignment.evaluate(&problem);
    let solution = SolutionExtractor::extract(&problem, &assignment, true);

    let mut out = Vec::new();
    write_solution(&mut out, &solution, &problem, None).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains("Vehicle #1: 0 -> 2 -> 0"));
    assert!(text.contains("Unvisited: 1"));
}

#[test]
fn test_search_statistics() {
    let stats = SearchStatistics {
        iterations: 120,
        local_optima: 7,
        runtime: Duration::from_millis(2500),
        construction_distance: 1000,
        best_distance: 750,
        unassigned: 0,
        penalized_edges: 9,
    };

    assert!((stats.improvement_ratio() - 0.25).abs() < 1e-9);

    let text = stats.format();
    assert!(text.contains("Iterations: 120"));
    assert!(text.contains("Local Optima: 7"));
    assert!(text.contains("Runtime: 0h 00m 02.500s"));
    assert!(text.contains("Best Distance: 750m (25.00% better)"));
    assert!(text.contains("Penalized Edges: 9"));

    assert_eq!(SearchStatistics::default().improvement_ratio(), 0.0);
}
