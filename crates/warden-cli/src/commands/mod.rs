mod apps;
mod block;
mod format;
mod permission;
mod start;
mod stats;
mod status;
mod stop;
mod watch;

pub use apps::execute as apps;
pub use block::{list as block_list, set as block_set};
pub use permission::execute as permission;
pub use start::execute as start;
pub use stats::execute as stats;
pub use status::execute as status;
pub use stop::execute as stop;
pub use watch::execute as watch;

use crate::client::ClientError;
use anyhow::{bail, Result};
use warden_protocol::Response;

/// Common handling for replies that are not the one a command expects.
fn fail(result: Result<Response, ClientError>) -> Result<()> {
    match result {
        Ok(Response::Error { message }) => bail!("{}", message),
        Ok(other) => bail!("unexpected response from daemon: {:?}", other),
        Err(ClientError::DaemonNotRunning) => daemon_not_running(),
        Err(ClientError::Timeout) => bail!("timed out connecting to the daemon"),
        Err(error) => bail!("{}", error),
    }
}

fn daemon_not_running() -> ! {
    eprintln!("The warden daemon is not running");
    eprintln!("   Start it with: warden-daemon");
    std::process::exit(1);
}
