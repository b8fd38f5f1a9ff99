use std::path::{Path, PathBuf};

use xnbd_api::{
    config::ClientSpec,
    constants::{DEVICE_DIRECTORY, XNBD_CLIENT},
};

use crate::exe::ExternalCommand;

/// Path of the block device node for a device name, e.g. `nbd0` -> `/dev/nbd0`.
pub fn device_path(device: &str) -> PathBuf {
    Path::new(DEVICE_DIRECTORY).join(device)
}

/// Attaches `device` to the export described by `client`.
pub fn connect(device: &str, client: &ClientSpec) -> ExternalCommand {
    let mut command = ExternalCommand::new(XNBD_CLIENT)
        .arg(device_path(device))
        .arg("--connect");
    if let Some(name) = &client.name {
        command = command.arg("--exportname").arg(name);
    }

    command.arg(&client.host).arg(client.port.to_string())
}

/// Detaches `device` from its server.
pub fn disconnect(device: &str) -> ExternalCommand {
    ExternalCommand::new(XNBD_CLIENT)
        .arg("--disconnect")
        .arg(device_path(device))
}
