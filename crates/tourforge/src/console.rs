//! Colorful console output for solver events.
//!
//! Provides a `tracing` layer that formats the driver's lifecycle events
//! with colors. Enabled with the `console` feature.

use std::io::{self, Write};
use std::sync::OnceLock;

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();

/// Default filter when `RUST_LOG` is unset.
const DEFAULT_DIRECTIVES: &str = "tourforge_tsp=debug,tourforge_engine=warn";

/// Initializes console output.
///
/// Without `RUST_LOG` the console shows the solve summary and one line per
/// injected subtour cut (DEBUG `lazy_cut` events of `tourforge_tsp`). Set
/// `RUST_LOG=tourforge_tsp=info` to hide the cuts.
///
/// Safe to call multiple times - only the first call has effect. Does
/// nothing if another global subscriber is already installed.
pub fn init() {
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(TourConsoleLayer)
            .try_init();
    });
}

/// A tracing layer that formats solver events with colors.
pub struct TourConsoleLayer;

impl<S: Subscriber> Layer<S> for TourConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if !event.metadata().target().starts_with("tourforge") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor);
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

#[derive(Default)]
struct EventVisitor {
    event: Option<String>,
    formulation: Option<String>,
    status: Option<String>,
    node_count: Option<u64>,
    edge_count: Option<u64>,
    variable_count: Option<u64>,
    nodes: Option<u64>,
    lazy_cuts: Option<u64>,
    component_size: Option<u64>,
    crossing_edges: Option<u64>,
    duration_ms: Option<u64>,
    objective: Option<f64>,
    bound: Option<f64>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value).trim_matches('"').to_string();
        match field.name() {
            "event" => self.event = Some(s),
            "formulation" => self.formulation = Some(s),
            "status" => self.status = Some(s),
            _ => {}
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "event" => self.event = Some(value.to_string()),
            "formulation" => self.formulation = Some(value.to_string()),
            "status" => self.status = Some(value.to_string()),
            _ => {}
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "node_count" => self.node_count = Some(value),
            "edge_count" => self.edge_count = Some(value),
            "variable_count" => self.variable_count = Some(value),
            "nodes" => self.nodes = Some(value),
            "lazy_cuts" => self.lazy_cuts = Some(value),
            "component_size" => self.component_size = Some(value),
            "crossing_edges" => self.crossing_edges = Some(value),
            "duration_ms" => self.duration_ms = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value.max(0) as u64);
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        match field.name() {
            "objective" => self.objective = Some(value),
            "bound" => self.bound = Some(value),
            _ => {}
        }
    }
}

fn format_event(v: &EventVisitor) -> String {
    match v.event.as_deref() {
        Some("solve_start") if v.formulation.is_some() => format_solve_start(v),
        Some("solve_end") if v.lazy_cuts.is_some() => format_solve_end(v),
        Some("lazy_cut") => format_lazy_cut(v),
        _ => String::new(),
    }
}

fn format_solve_start(v: &EventVisitor) -> String {
    format!(
        "{} {} {} formulation ({}), node count ({}), edge count ({}), variable count ({})",
        timestamp().bright_black(),
        "INFO".bright_green(),
        "[Solver]".bright_cyan(),
        v.formulation.as_deref().unwrap_or("unknown").white().bold(),
        count(v.node_count).bright_yellow(),
        count(v.edge_count).bright_yellow(),
        count(v.variable_count).bright_yellow(),
    )
}

fn format_solve_end(v: &EventVisitor) -> String {
    let status = v.status.as_deref().unwrap_or("Unknown");
    let objective = v.objective.unwrap_or(f64::INFINITY);
    let bound = v.bound.unwrap_or(0.0);

    let mut output = format!(
        "{} {} {} Solving ended: time spent ({}), nodes ({}), lazy cuts ({})",
        timestamp().bright_black(),
        "INFO".bright_green(),
        "[Solver]".bright_cyan(),
        format_duration_ms(v.duration_ms.unwrap_or(0)).yellow(),
        count(v.nodes).white(),
        count(v.lazy_cuts).white(),
    );

    let rule = "═".repeat(58);
    output.push_str("\n\n");
    output.push_str(&format!("╔{rule}╗").bright_cyan().to_string());
    output.push('\n');
    let status_line = format!("{:^58}", status.to_uppercase());
    let status_colored = match status {
        "Optimal" | "Feasible" => status_line.bright_green().bold().to_string(),
        _ => status_line.bright_red().bold().to_string(),
    };
    output.push_str(&format!("{}{}{}", "║".bright_cyan(), status_colored, "║".bright_cyan()));
    output.push('\n');
    output.push_str(&format!("╠{rule}╣").bright_cyan().to_string());
    output.push('\n');
    for (label, value) in [("Objective:", objective), ("Lower bound:", bound)] {
        output.push_str(&format!(
            "{}  {:<18}{:>36}  {}",
            "║".bright_cyan(),
            label,
            format_value(value),
            "║".bright_cyan()
        ));
        output.push('\n');
    }
    output.push_str(&format!("╚{rule}╝").bright_cyan().to_string());
    output.push('\n');

    output
}

fn format_lazy_cut(v: &EventVisitor) -> String {
    format!(
        "    {} cut: component of {} nodes, {} crossing edges",
        "->".bright_blue(),
        count(v.component_size).white(),
        count(v.crossing_edges).white(),
    )
}

fn count(value: Option<u64>) -> String {
    value.unwrap_or(0).to_formatted_string(&Locale::en)
}

fn format_value(value: f64) -> String {
    if value.is_finite() {
        format!("{value:.4}")
    } else {
        "inf".to_string()
    }
}

fn timestamp() -> String {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| {
            let secs = d.as_secs() % 100000;
            let millis = d.subsec_millis();
            format!("{:5}.{:03}", secs, millis)
        })
        .unwrap_or_else(|_| "    0.000".to_string())
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use tourforge_test::graphs::two_triangles;

    use super::*;
    use crate::TspSolver;

    /// Records the `event` field of every event that passes the filter.
    #[derive(Clone, Default)]
    struct RecordedEvents(Arc<Mutex<Vec<String>>>);

    impl<S: Subscriber> Layer<S> for RecordedEvents {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let mut visitor = EventVisitor::default();
            event.record(&mut visitor);
            if let Some(name) = visitor.event {
                self.0.lock().unwrap().push(name);
            }
        }
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration_ms(250), "250ms");
        assert_eq!(format_duration_ms(1500), "1.50s");
        assert_eq!(format_duration_ms(125_000), "2m 5s");
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(80.0), "80.0000");
        assert_eq!(format_value(f64::INFINITY), "inf");
    }

    #[test]
    fn test_unknown_event_is_silent() {
        let visitor = EventVisitor {
            event: Some("incumbent".to_string()),
            ..EventVisitor::default()
        };
        assert!(format_event(&visitor).is_empty());
    }

    #[test]
    fn test_format_lazy_cut() {
        let visitor = EventVisitor {
            event: Some("lazy_cut".to_string()),
            component_size: Some(3),
            crossing_edges: Some(3),
            ..EventVisitor::default()
        };
        let line = format_event(&visitor);
        assert!(line.contains("component of"));
        assert!(line.contains("crossing edges"));
    }

    #[test]
    fn test_default_filter_shows_cuts() {
        let recorded = RecordedEvents::default();
        let subscriber = tracing_subscriber::registry()
            .with(EnvFilter::new(DEFAULT_DIRECTIVES))
            .with(recorded.clone());

        let graph = two_triangles();
        tracing::subscriber::with_default(subscriber, || {
            let mut solver = TspSolver::new(&graph).unwrap();
            solver.solve(Duration::from_secs(30)).unwrap();
        });

        let events = recorded.0.lock().unwrap();
        assert!(events.iter().any(|e| e == "solve_start"));
        assert!(events.iter().any(|e| e == "lazy_cut"));
        assert!(events.iter().any(|e| e == "solve_end"));
        // engine events stay below its warn directive
        assert!(!events.iter().any(|e| e == "incumbent"));
    }

    #[test]
    fn test_init_twice() {
        init();
        init();
    }
}
