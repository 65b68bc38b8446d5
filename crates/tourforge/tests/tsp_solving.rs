//! Integration tests for end-to-end TSP solving.
//!
//! Every instance is solved with both formulations; both must agree on the
//! optimum and return a single tour over all nodes.

use std::time::Duration;

use tourforge::prelude::*;
use tourforge::ExplorationType;
use tourforge_test::graphs::{
    decoy, disconnected, k4, perimeter, polygon, two_triangles, DECOY_CHEAP_EDGE_TOUR,
    DECOY_OPTIMUM, K4_OPTIMUM, TWO_TRIANGLES_DEGREE_ONLY, TWO_TRIANGLES_OPTIMUM,
};

const TIME_LIMIT: Duration = Duration::from_secs(30);

const FORMULATIONS: [FormulationType; 2] = [FormulationType::LazyCuts, FormulationType::Circuit];

fn config(formulation: FormulationType) -> SolverConfig {
    SolverConfig::new().with_formulation(formulation)
}

fn solve(graph: &Graph, config: SolverConfig) -> TspOutcome {
    let mut solver = TspSolver::with_config(graph, config).unwrap();
    solver.set_time_limit(TIME_LIMIT);
    solver.solve_detailed().unwrap()
}

#[test]
fn test_k4_both_formulations() {
    let graph = k4();
    for formulation in FORMULATIONS {
        let mut solver = TspSolver::with_config(&graph, config(formulation)).unwrap();
        let (objective, bound) = solver.solve(TIME_LIMIT).unwrap();

        assert_eq!(objective, K4_OPTIMUM, "{formulation}");
        assert_eq!(bound, K4_OPTIMUM, "{formulation}");
        let tour = solver.solution().unwrap();
        assert!(tour.is_hamiltonian_cycle(), "{formulation}");
        assert_eq!(tour.cost(&graph), Some(K4_OPTIMUM));
    }
}

#[test]
fn test_two_triangles_need_subtour_elimination() {
    let graph = two_triangles();
    for formulation in FORMULATIONS {
        let outcome = solve(&graph, config(formulation));

        assert_eq!(outcome.status, SolveStatus::Optimal, "{formulation}");
        assert_eq!(
            outcome.objective_and_bound(),
            (TWO_TRIANGLES_OPTIMUM, TWO_TRIANGLES_OPTIMUM),
            "{formulation}"
        );
        let tour = outcome.tour.unwrap();
        assert_eq!(tour.components().len(), 1);
        assert!(tour.is_hamiltonian_cycle());
    }
}

#[test]
fn test_lazy_cuts_are_injected() {
    let graph = two_triangles();
    let outcome = solve(&graph, config(FormulationType::LazyCuts));

    assert!(outcome.statistics.lazy_constraints_added >= 2);
    assert!(outcome.statistics.candidates_rejected >= 1);
}

#[test]
fn test_degree_relaxation_accepts_subtours() {
    let graph = two_triangles();
    let config = config(FormulationType::LazyCuts).with_lazy_constraints(false);
    let outcome = solve(&graph, config);

    assert_eq!(outcome.status, SolveStatus::Optimal);
    assert_eq!(outcome.objective, TWO_TRIANGLES_DEGREE_ONLY);
    let solution = outcome.tour.unwrap();
    assert_eq!(solution.components(), vec![vec![0, 1, 2], vec![3, 4, 5]]);
    assert!(!solution.is_hamiltonian_cycle());
    assert_eq!(outcome.statistics.lazy_constraints_added, 0);
}

#[test]
fn test_polygon_tour_is_perimeter() {
    let graph = polygon(6);
    for formulation in FORMULATIONS {
        let outcome = solve(&graph, config(formulation));

        assert_eq!(outcome.status, SolveStatus::Optimal, "{formulation}");
        assert!((outcome.objective - perimeter(6)).abs() < 1e-9, "{formulation}");
        let order = outcome.tour.as_ref().and_then(SolutionGraph::tour_order);
        assert!(
            order == Some(vec![0, 1, 2, 3, 4, 5]) || order == Some(vec![0, 5, 4, 3, 2, 1]),
            "{formulation}: {order:?}"
        );
    }
}

#[test]
fn test_lower_bound_never_exceeds_objective() {
    for graph in [k4(), two_triangles(), polygon(5), polygon(6)] {
        for formulation in FORMULATIONS {
            for exploration_type in [ExplorationType::DepthFirst, ExplorationType::BestBoundFirst] {
                let config = config(formulation).with_exploration_type(exploration_type);
                let (objective, bound) = solve(&graph, config).objective_and_bound();

                assert!(objective.is_finite());
                assert!(bound <= objective + 1e-9, "{formulation}/{exploration_type}");
            }
        }
    }
}

#[test]
fn test_disconnected_graph_returns_sentinel() {
    let graph = disconnected();
    for formulation in FORMULATIONS {
        let mut solver = TspSolver::with_config(&graph, config(formulation)).unwrap();

        assert_eq!(solver.solve(TIME_LIMIT).unwrap(), NO_SOLUTION, "{formulation}");
        assert!(solver.solution().is_none());
    }
}

#[test]
fn test_disconnected_graph_is_infeasible() {
    let graph = disconnected();
    for formulation in FORMULATIONS {
        let outcome = solve(&graph, config(formulation));
        assert_eq!(outcome.status, SolveStatus::Infeasible, "{formulation}");
        assert!(outcome.tour.is_none());
    }
}

#[test]
fn test_zero_time_limit_returns_sentinel() {
    let graph = k4();
    for formulation in FORMULATIONS {
        let mut solver = TspSolver::with_config(&graph, config(formulation)).unwrap();
        solver.set_time_limit(Duration::ZERO);
        let outcome = solver.solve_detailed().unwrap();

        assert_eq!(outcome.status, SolveStatus::TimeLimitNoSolution, "{formulation}");
        assert_eq!(outcome.objective_and_bound(), NO_SOLUTION);
        assert!(solver.solution().is_none());
    }
}

#[test]
fn test_node_limit_without_solution() {
    let graph = polygon(6);
    let config = config(FormulationType::LazyCuts).with_node_count_limit(1);
    let outcome = solve(&graph, config);

    assert_eq!(outcome.status, SolveStatus::TimeLimitNoSolution);
    assert_eq!(outcome.statistics.nodes_explored, 1);
    assert_eq!(outcome.objective_and_bound(), NO_SOLUTION);
}

#[test]
fn test_node_limit_with_solution_is_feasible() {
    let graph = decoy();
    for formulation in FORMULATIONS {
        // root, the cheapest edge, then the first complete tour
        let config = config(formulation).with_node_count_limit(3);
        let outcome = solve(&graph, config);

        assert_eq!(outcome.status, SolveStatus::Feasible, "{formulation}");
        assert_eq!(outcome.statistics.nodes_explored, 3);
        assert_ne!(outcome.objective_and_bound(), NO_SOLUTION);

        let (objective, bound) = outcome.objective_and_bound();
        assert_eq!(objective, DECOY_CHEAP_EDGE_TOUR);
        assert!(bound <= DECOY_OPTIMUM, "{formulation}: bound {bound}");
        assert!(outcome.gap() > Some(0.0));

        let tour = outcome.tour.as_ref().expect("feasible outcome has a tour");
        assert!(tour.is_hamiltonian_cycle());
        assert_eq!(tour.cost(&graph), Some(objective));
    }
}

#[test]
fn test_decoy_without_limit_is_optimal() {
    let graph = decoy();
    for formulation in FORMULATIONS {
        let outcome = solve(&graph, config(formulation));

        assert_eq!(outcome.status, SolveStatus::Optimal, "{formulation}");
        assert_eq!(outcome.objective_and_bound(), (DECOY_OPTIMUM, DECOY_OPTIMUM));
    }
}

#[test]
fn test_resolve_is_deterministic() {
    let graph = two_triangles();
    for formulation in FORMULATIONS {
        let first = solve(&graph, config(formulation));
        let second = solve(&graph, config(formulation));
        assert_eq!(first.objective_and_bound(), second.objective_and_bound());
        assert_eq!(first.tour, second.tour);

        // the same solver again, with cuts from the first run in place
        let mut solver = TspSolver::with_config(&graph, config(formulation)).unwrap();
        let once = solver.solve(TIME_LIMIT).unwrap();
        let twice = solver.solve(TIME_LIMIT).unwrap();
        assert_eq!(once, twice);
    }
}

#[test]
fn test_config_from_toml() {
    let config = SolverConfig::from_toml_str(
        r#"
        formulation = "circuit"

        [termination]
        seconds_spent_limit = 30

        [search]
        exploration_type = "best_bound_first"
    "#,
    )
    .unwrap();

    let graph = k4();
    let mut solver = TspSolver::with_config(&graph, config).unwrap();
    let outcome = solver.solve_detailed().unwrap();

    assert_eq!(solver.formulation().kind(), FormulationType::Circuit);
    assert_eq!(outcome.objective_and_bound(), (K4_OPTIMUM, K4_OPTIMUM));
}
