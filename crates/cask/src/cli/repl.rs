//! Interactive command loop.

use std::io::Write;

use cask_common::{CaskError, CaskResult, ContainerId};
use tabled::{Table, Tabled};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use super::command::Command;
use crate::runtime::{ContainerRegistry, ContainerSnapshot, ShutdownReport, Transition};

const BANNER: &str = "Welcome to cask, a minimal container supervisor.";
const USAGE: &str =
    "Commands: create <name> <cpu_limit> <mem_limit>, delete <id>, list, stop <id>, start <id>, exit";

#[derive(Tabled)]
struct ContainerRow {
    #[tabled(rename = "ID")]
    id: u32,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "STATE")]
    state: String,
    #[tabled(rename = "CPU")]
    cpu: i64,
    #[tabled(rename = "MEMORY")]
    memory: i64,
    #[tabled(rename = "PID")]
    pid: u32,
}

impl From<ContainerSnapshot> for ContainerRow {
    fn from(c: ContainerSnapshot) -> Self {
        Self {
            id: c.id.get(),
            name: c.name.to_string(),
            state: c.status.to_string(),
            cpu: c.limits.cpu,
            memory: c.limits.memory,
            pid: c.pid,
        }
    }
}

/// Reads commands line by line and applies them to a registry.
///
/// One command runs to completion before the next line is read. The loop
/// ends on `exit` or end of input, and both run the registry's shutdown.
#[derive(Debug)]
pub struct Repl<W> {
    registry: ContainerRegistry,
    output: W,
}

impl<W: Write> Repl<W> {
    /// Create a loop over `registry` that writes responses to `output`.
    pub fn new(registry: ContainerRegistry, output: W) -> Self {
        Self { registry, output }
    }

    /// Run until `exit` or end of input, then shut the registry down.
    ///
    /// Command failures are reported on the output and never end the loop;
    /// only I/O errors on the streams themselves are returned. The registry
    /// is shut down even when such an error ends the loop early.
    pub async fn run<R>(mut self, input: R) -> CaskResult<ShutdownReport>
    where
        R: AsyncBufRead + Unpin,
    {
        let outcome = self.serve(input).await;
        if let Err(e) = &outcome {
            tracing::error!(error = %e, "Command loop failed");
        }

        let report = self.registry.shutdown_all().await;
        outcome.map(|()| report)
    }

    async fn serve<R>(&mut self, mut input: R) -> CaskResult<()>
    where
        R: AsyncBufRead + Unpin,
    {
        writeln!(self.output, "{BANNER}")?;
        writeln!(self.output, "{USAGE}")?;

        let mut buf = Vec::new();
        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;

            buf.clear();
            if input.read_until(b'\n', &mut buf).await? == 0 {
                writeln!(self.output)?;
                tracing::debug!("End of input");
                break;
            }

            // Invalid UTF-8 becomes replacement characters, which parse as unknown.
            let line = String::from_utf8_lossy(&buf);
            let command = Command::parse(&line);
            tracing::debug!(?command, "Parsed command");
            if command == Command::Exit {
                break;
            }
            self.dispatch(command).await?;
        }

        writeln!(self.output, "Exiting.")?;
        self.output.flush()?;
        Ok(())
    }

    async fn dispatch(&mut self, command: Command) -> CaskResult<()> {
        match command {
            Command::Create { name, limits } => {
                match self.registry.create(&name, limits).await {
                    Ok(id) => {
                        let container = self.registry.inspect(id)?;
                        writeln!(
                            self.output,
                            "Container '{}' (ID: {}, PID: {}) created and running (CPU limit: {}, memory limit: {})",
                            container.name, id, container.pid, limits.cpu, limits.memory
                        )?;
                    }
                    Err(CaskError::CapacityExceeded { capacity }) => {
                        writeln!(
                            self.output,
                            "Cannot create more containers (capacity {capacity} reached)."
                        )?;
                    }
                    Err(e) => self.report(&e)?,
                }
            }
            Command::Delete(raw) => {
                if let Some(id) = self.lookup(raw)? {
                    match self.registry.delete(id).await {
                        Ok(()) => writeln!(self.output, "Container ID {id} deleted")?,
                        Err(e) => self.report(&e)?,
                    }
                }
            }
            Command::List => self.list()?,
            Command::Stop(raw) => {
                if let Some(id) = self.lookup(raw)? {
                    match self.registry.stop(id) {
                        Ok(Transition::Applied) => {
                            writeln!(self.output, "Container ID {id} stopped")?;
                        }
                        Ok(Transition::Unchanged) => {
                            writeln!(self.output, "Container is already stopped.")?;
                        }
                        Err(e) => self.report(&e)?,
                    }
                }
            }
            Command::Start(raw) => {
                if let Some(id) = self.lookup(raw)? {
                    match self.registry.start(id) {
                        Ok(Transition::Applied) => {
                            writeln!(self.output, "Container ID {id} started")?;
                        }
                        Ok(Transition::Unchanged) => {
                            writeln!(self.output, "Container is already running.")?;
                        }
                        Err(e) => self.report(&e)?,
                    }
                }
            }
            Command::Unknown => writeln!(self.output, "Unknown command.")?,
            Command::Exit => {}
        }
        Ok(())
    }

    /// Convert a raw ID, reporting a miss for values no container can have.
    fn lookup(&mut self, raw: i64) -> CaskResult<Option<ContainerId>> {
        if let Ok(id) = ContainerId::try_from(raw) {
            return Ok(Some(id));
        }
        writeln!(self.output, "Container with ID {raw} not found.")?;
        Ok(None)
    }

    fn list(&mut self) -> CaskResult<()> {
        let rows: Vec<ContainerRow> = self
            .registry
            .list()
            .into_iter()
            .map(ContainerRow::from)
            .collect();

        if rows.is_empty() {
            writeln!(self.output, "No containers.")?;
        } else {
            writeln!(self.output, "{}", Table::new(rows))?;
        }
        Ok(())
    }

    fn report(&mut self, err: &CaskError) -> CaskResult<()> {
        tracing::warn!(error = %err, "Command failed");
        match err {
            CaskError::NotFound { id } => {
                writeln!(self.output, "Container with ID {id} not found.")?;
            }
            CaskError::SpawnFailed { .. } => {
                writeln!(self.output, "Failed to create container: {err}")?;
            }
            _ => writeln!(self.output, "Error: {err}")?,
        }
        Ok(())
    }
}
