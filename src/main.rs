use clap::Parser;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::{Context, Editor, Helper, Highlighter, Hinter, Validator};
use shiftplan::demand::{HourlyDemand, LocationId};
use shiftplan::report::{demand_rows, hour_rows, shift_rows, LocationRow};
use shiftplan::scenario::Scenario;
use shiftplan::staffing::solution::StaffingOutcome;
use shiftplan::staffing::solver::MicroLpSolver;
use shiftplan::staffing::{optimize_all, plan};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
struct Args {
    /// Path to the JSON scenario file
    #[arg(short, long, value_name = "FILE", default_value = "data/default.json")]
    scenario: PathBuf,

    /// Log filter, e.g. `shiftplan=debug`
    #[arg(long, default_value = "shiftplan=info")]
    log: String,

    /// Override the arrivals one staff member serves per hour
    #[arg(long)]
    capacity: Option<f64>,

    /// Override the ceiling on staff present in any hour
    #[arg(long)]
    max_staff: Option<u32>,

    #[arg(long)]
    cost_full: Option<f64>,

    #[arg(long)]
    cost_part: Option<f64>,
}

#[derive(Helper, Hinter, Highlighter, Validator)]
pub struct CompleteHelper {
    pub commands: Vec<String>,
}

impl Completer for CompleteHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, _pos: usize, _ctx: &Context<'_>) -> rustyline::Result<(usize, Vec<Pair>)> {
        let mut candidates = Vec::new();

        for cmd in &self.commands {
            if cmd.starts_with(line) {
                candidates.push(Pair {
                    display: cmd.clone(),
                    replacement: format!("{} ", cmd),
                });
            }
        }

        Ok((0, candidates))
    }
}

fn paginate(content: String) {
    let pager = Command::new("less")
        .arg("-R")
        .stdin(Stdio::piped())
        .spawn()
        // Fallback to 'more' if 'less' isn't available
        .or_else(|_| Command::new("more").stdin(Stdio::piped()).spawn());

    let mut pager = match pager {
        Ok(pager) => pager,
        Err(_) => {
            println!("{}", content);
            return;
        }
    };

    if let Some(mut stdin) = pager.stdin.take() {
        if let Err(e) = stdin.write_all(content.as_bytes()) {
            // Broken pipe is common if the user quits the pager early
            if e.kind() != std::io::ErrorKind::BrokenPipe {
                eprintln!("Error writing to pager: {}", e);
            }
        }
    }

    // Wait for the user to close the pager before returning to the ">> " prompt
    let _ = pager.wait();
}

fn print_table<T: Tabled>(rows: &[T]) {
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.with(tabled::settings::Alignment::left());
    if rows.len() > 20 {
        paginate(table.to_string());
    } else {
        println!("{}", table);
    }
}

fn print_outcome(location: &LocationId, outcome: &StaffingOutcome) {
    match outcome {
        StaffingOutcome::Feasible(solution) => {
            println!(
                "\n{} {} total cost {:.2}",
                location.as_ref().bold(),
                "optimal".green(),
                solution.total_cost()
            );
            let shifts = shift_rows(solution);
            if shifts.is_empty() {
                println!("No shifts needed.");
            } else {
                print_table(&shifts);
            }
            print_table(&hour_rows(solution));
        }
        StaffingOutcome::Infeasible { status } => {
            println!("\n{} {}", location.as_ref().bold(), status.to_string().red());
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&args.log))?)
        .init();

    let mut scenario = Scenario::load_from_file(&args.scenario)?;
    let overrides = [
        ("capacity", args.capacity.map(|v| v.to_string())),
        ("max_staff", args.max_staff.map(|v| v.to_string())),
        ("cost_full", args.cost_full.map(|v| v.to_string())),
        ("cost_part", args.cost_part.map(|v| v.to_string())),
    ];
    for (field, value) in overrides {
        if let Some(value) = value {
            scenario.policy.set(field, &value)?;
        }
    }

    let mut curves: BTreeMap<LocationId, HourlyDemand> = scenario.demand()?;
    println!(
        "Planner ready. Loaded {} events for {} locations from {}",
        scenario.events.len(),
        curves.len(),
        args.scenario.display()
    );

    let solver = MicroLpSolver::new();

    let config = rustyline::Config::builder()
        .history_ignore_space(true)
        .completion_type(rustyline::CompletionType::List)
        .build();

    let helper = CompleteHelper {
        commands: vec![
            "ls".to_string(),
            "demand".to_string(),
            "solve".to_string(),
            "policy".to_string(),
            "set".to_string(),
            "help".to_string(),
            "exit".to_string(),
        ],
    };

    let mut rl = Editor::with_config(config)?;
    rl.set_helper(Some(helper));

    loop {
        let readline = rl.readline(">> ");
        match readline {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() { continue; }

                rl.add_history_entry(trimmed)?;

                let parts: Vec<&str> = trimmed.split_whitespace().collect();
                match parts[0] {
                    "ls" => {
                        let rows = curves.iter()
                            .filter_map(|(location, demand)| LocationRow::new(location, demand))
                            .collect::<Vec<_>>();
                        if rows.is_empty() {
                            println!("No locations loaded.")
                        } else {
                            print_table(&rows);
                        }
                    },
                    "demand" => {
                        match parts.get(1).and_then(|loc| curves.get_key_value(*loc)) {
                            Some((_, demand)) => print_table(&demand_rows(demand)),
                            None => println!("Usage: demand <location>"),
                        }
                    },
                    "solve" => {
                        match parts.get(1) {
                            Some(loc) => match curves.get_key_value(*loc) {
                                Some((location, demand)) => match plan(demand, &scenario.policy, &solver) {
                                    Ok(outcome) => print_outcome(location, &outcome),
                                    Err(e) => println!("{} {}", "Error:".red(), e),
                                },
                                None => println!("Unknown location: {}", loc),
                            },
                            None => {
                                for (location, result) in optimize_all(&curves, &scenario.policy, &solver) {
                                    match result {
                                        Ok(outcome) => print_outcome(&location, &outcome),
                                        Err(e) => println!("{} {}: {}", "Error:".red(), location, e),
                                    }
                                }
                            }
                        }
                    },
                    "policy" => {
                        match serde_json::to_string_pretty(&scenario.policy) {
                            Ok(text) => println!("{}", text),
                            Err(e) => println!("{} {}", "Error:".red(), e),
                        }
                    },
                    "set" => {
                        if let (Some(field), Some(value)) = (parts.get(1), parts.get(2)) {
                            let window = scenario.policy.window();
                            match scenario.policy.set(field, value) {
                                Ok(()) => {
                                    if scenario.policy.window() != window {
                                        curves = scenario.demand()?;
                                    }
                                    println!("{} = {}", field, value);
                                }
                                Err(e) => println!("{} {}", "Error:".red(), e),
                            }
                        } else {
                            println!("Usage: set <field> <value>");
                        }
                    },
                    "help" | "?" => {
                        println!("\nAvailable Commands:");
                        println!("  ls                  - List locations with daily demand and peak hour");
                        println!("  demand <loc>        - Show the average hourly demand of <loc>");
                        println!("  solve [loc]         - Plan shifts for <loc>, or for every location");
                        println!("  policy              - Show the current staffing policy");
                        println!("  set <field> <value> - Change a policy field, e.g. set cost_full 140");
                        println!("  help / ?            - Show this help menu");
                        println!("  exit / quit         - Exit the planner\n");
                    },
                    "exit" | "quit" => break,
                    _ => println!("Unknown command: {}", parts[0]),
                }
            },
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            },
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            },
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    Ok(())
}
