//! Cross-implementation round trips.
//!
//! A [`Collaborator`] is an external program that reads TyTx text on standard
//! input, decodes it with its own implementation, and writes the re-encoded
//! text to standard output. Exit status zero means success; anything else,
//! or running past the timeout, fails the exchange with
//! [`Error::RoundTrip`] carrying whatever the program wrote to standard
//! error. Exchanges are never retried.
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use tytx_bag::{bag, round_trip, Collaborator, Density};
//!
//! let original = bag! { "price" => 10 }.unwrap();
//! let peer = Collaborator::new("node")
//!     .arg("roundtrip.js")
//!     .timeout(Duration::from_secs(10));
//!
//! let back = round_trip(&original, &peer, Density::Compact).unwrap();
//! assert!(original.is_equivalent(&back));
//! ```

use crate::{Bag, Decoder, Density, Encoder, Error, Result, Transport, TytxOptions};
use std::ffi::{OsStr, OsString};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Default limit for one exchange.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// An external program taking part in a round trip.
#[derive(Clone, Debug)]
pub struct Collaborator {
    program: OsString,
    args: Vec<OsString>,
    current_dir: Option<PathBuf>,
    timeout: Duration,
}

impl Collaborator {
    /// A collaborator running `program` with no arguments.
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        Collaborator {
            program: program.as_ref().to_os_string(),
            args: Vec::new(),
            current_dir: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    #[must_use]
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn program(&self) -> &OsStr {
        &self.program
    }

    /// Feeds `input` to the program and returns its standard output.
    ///
    /// # Errors
    ///
    /// [`Error::RoundTrip`] if the program cannot be started, exits with a
    /// non-zero status, outlives the timeout, or writes non-UTF-8 output.
    pub fn exchange(&self, input: &str) -> Result<String> {
        let program = self.program.to_string_lossy().into_owned();
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.current_dir {
            command.current_dir(dir);
        }

        debug!(program = %program, bytes = input.len(), "spawning collaborator");
        let mut child = command.spawn().map_err(|e| {
            warn!(program = %program, error = %e, "collaborator failed to start");
            Error::round_trip(format!("failed to start '{}': {}", program, e), "")
        })?;

        // The peer may exit without reading; a broken pipe here is not an error.
        let writer = child.stdin.take().map(|mut stdin| {
            let input = input.as_bytes().to_vec();
            background(move || {
                stdin.write_all(&input).ok();
            })
        });
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if Instant::now() >= deadline => {
                    child.kill().ok();
                    child.wait().ok();
                    warn!(program = %program, timeout = ?self.timeout, "collaborator timed out");
                    return Err(Error::round_trip(
                        format!("'{}' did not finish within {:?}", program, self.timeout),
                        "",
                    ));
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    child.kill().ok();
                    return Err(Error::round_trip(format!("failed to wait for '{}': {}", program, e), ""));
                }
            }
        };

        // A process the peer left behind may still hold the pipes open.
        let pipes = (
            collect(writer, deadline),
            collect(stdout, deadline),
            collect(stderr, deadline),
        );
        let (Some(()), Some(stdout), Some(stderr)) = pipes else {
            warn!(program = %program, timeout = ?self.timeout, "collaborator streams still open");
            return Err(Error::round_trip(
                format!(
                    "'{}' exited but its standard streams stayed open past {:?}",
                    program, self.timeout
                ),
                "",
            ));
        };
        let stderr = String::from_utf8_lossy(&stderr).into_owned();

        if !status.success() {
            warn!(program = %program, %status, "collaborator failed");
            return Err(Error::round_trip(format!("'{}' exited with {}", program, status), &stderr));
        }
        debug!(program = %program, bytes = stdout.len(), "collaborator finished");
        String::from_utf8(stdout)
            .map_err(|_| Error::round_trip(format!("'{}' wrote output that is not UTF-8", program), &stderr))
    }
}

/// Runs `job` on a helper thread; its result arrives on the returned channel.
fn background<T, F>(job: F) -> Receiver<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        tx.send(job()).ok();
    });
    rx
}

fn drain<R>(pipe: Option<R>) -> Option<Receiver<Vec<u8>>>
where
    R: Read + Send + 'static,
{
    pipe.map(|mut pipe| {
        background(move || {
            let mut buf = Vec::new();
            pipe.read_to_end(&mut buf).ok();
            buf
        })
    })
}

/// Waits for a helper until `deadline`; `None` means it is still running.
fn collect<T: Default>(result: Option<Receiver<T>>, deadline: Instant) -> Option<T> {
    let Some(rx) = result else {
        return Some(T::default());
    };
    match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
        Ok(value) => Some(value),
        Err(RecvTimeoutError::Disconnected) => Some(T::default()),
        Err(RecvTimeoutError::Timeout) => None,
    }
}

/// Sends `bag` through `collaborator` as text in `density` and decodes the reply.
///
/// The reply may use either density. Compare the result with
/// [`Bag::is_equivalent`] rather than `==`, since the peer may normalise
/// values.
pub fn round_trip(bag: &Bag, collaborator: &Collaborator, density: Density) -> Result<Bag> {
    let text = Encoder::new(TytxOptions::new().with_density(density)).encode_text(bag)?;
    let reply = collaborator.exchange(&text)?;
    Decoder::new(Transport::Text).decode(reply.trim().as_bytes())
}
