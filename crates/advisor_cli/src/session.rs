//! Interactive adjustment loop
//!
//! Prints a recommendation, then lets the user mark ingredients unavailable
//! and regenerates the menu until they exit. The prediction is computed once;
//! only the blend is recomputed.
//!
//! Marked ingredients accumulate: each round adds to the names excluded so
//! far instead of replacing them, and there is no way to bring one back
//! within a session.

use crate::parse_ingredient_list;
use anyhow::{Context, Result};
use cattle_nutrition_core::{format_report, AdvisorService, PredictionRequest};
use std::io::{BufRead, Write};
use tracing::{debug, warn};

const MENU: &str = "\nOptions:\n  1. Mark ingredients as unavailable\n  2. Exit\nChoose an option: ";

/// Run the session over any line source and sink
///
/// Returns the final list of unavailable ingredients. End of input ends the
/// session like option 2.
pub fn run_session<R, W>(
    service: &AdvisorService,
    request: &PredictionRequest,
    mut input: R,
    mut output: W,
) -> Result<Vec<String>>
where
    R: BufRead,
    W: Write,
{
    let (info, prediction) = service.predict(request)?;
    let mut unavailable: Vec<String> = Vec::new();

    let menu = service.recommend(&prediction, &unavailable)?;
    writeln!(output, "{}", format_report(&info, &prediction, &menu))?;

    loop {
        write!(output, "{MENU}")?;
        output.flush()?;

        let Some(choice) = read_line(&mut input)? else {
            break;
        };
        match choice.as_str() {
            "1" => {
                write!(output, "Enter unavailable ingredients (comma-separated): ")?;
                output.flush()?;
                let Some(line) = read_line(&mut input)? else {
                    break;
                };

                let added: Vec<String> = parse_ingredient_list(&line)
                    .into_iter()
                    .filter(|name| !unavailable.iter().any(|u| u.eq_ignore_ascii_case(name)))
                    .collect();
                if added.is_empty() {
                    writeln!(output, "No new ingredients given.")?;
                    continue;
                }

                let mut candidate = unavailable.clone();
                candidate.extend(added.iter().cloned());
                match service.recommend(&prediction, &candidate) {
                    Ok(menu) => {
                        debug!("Marked unavailable: {:?}", added);
                        unavailable = candidate;
                        writeln!(output, "\n{}", format_report(&info, &prediction, &menu))?;
                    }
                    Err(err) => {
                        warn!("Keeping previous menu: {}", err);
                        writeln!(
                            output,
                            "Could not build a menu without {}: {}",
                            added.join(", "),
                            err
                        )?;
                    }
                }
            }
            "2" => break,
            other => writeln!(output, "Unknown option '{other}'. Enter 1 or 2.")?,
        }
    }

    writeln!(output, "Goodbye.")?;
    Ok(unavailable)
}

fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    let read = input.read_line(&mut line).context("Failed to read input")?;
    Ok((read > 0).then(|| line.trim().to_string()))
}
