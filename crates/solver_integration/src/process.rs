use std::{io, process::Stdio};

use async_trait::async_trait;
use shared::notation::MoveToken;
use tokio::{io::AsyncWriteExt, process::Command};
use tracing::{debug, warn};

use crate::{parse_solution_line, ExternalSolver, SolveFailure};

/// Runs a local two-phase solver executable once per cube.
///
/// The facelet string is written to stdin as a single line, optionally after a
/// command prefix such as `solve `. The answer is the last stdout line made only
/// of valid move tokens, with timing and move-count annotations discarded. Output
/// without such a line is a rejection carrying the last line.
pub struct ProcessSolver {
    program: String,
    args: Vec<String>,
    input_prefix: String,
}

impl ProcessSolver {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            input_prefix: String::new(),
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn input_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.input_prefix = prefix.into();
        self
    }
}

fn classify_spawn_error(program: &str, err: io::Error) -> SolveFailure {
    match err.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
            SolveFailure::Unavailable(format!("cannot start solver '{program}': {err}"))
        }
        _ => SolveFailure::Other(format!("solver '{program}' failed: {err}")),
    }
}

#[async_trait]
impl ExternalSolver for ProcessSolver {
    async fn solve(&self, facelets: &str) -> Result<Vec<String>, SolveFailure> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| classify_spawn_error(&self.program, err))?;

        if let Some(mut stdin) = child.stdin.take() {
            let line = format!("{}{facelets}\n", self.input_prefix);
            if let Err(err) = stdin.write_all(line.as_bytes()).await {
                // Solver may exit before reading stdin.
                warn!(program = %self.program, error = %err, "failed to write cube to solver stdin");
            }
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|err| classify_spawn_error(&self.program, err))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let reason = if stderr.is_empty() {
                format!("solver exited with {}", output.status)
            } else {
                stderr
            };
            return Err(SolveFailure::Rejected(reason));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let candidates: Vec<Vec<String>> = stdout
            .lines()
            .map(parse_solution_line)
            .filter(|tokens| !tokens.is_empty())
            .collect();
        let Some(tokens) = candidates
            .iter()
            .rev()
            .find(|tokens| tokens.iter().all(|t| t.parse::<MoveToken>().is_ok()))
            .cloned()
        else {
            let last = stdout
                .lines()
                .map(str::trim)
                .rfind(|line| !line.is_empty())
                .unwrap_or("solver output contained no move sequence");
            return Err(SolveFailure::Rejected(last.to_string()));
        };

        debug!(program = %self.program, moves = tokens.len(), "solver process finished");
        Ok(tokens)
    }

    fn backend_name(&self) -> &str {
        "process"
    }
}
