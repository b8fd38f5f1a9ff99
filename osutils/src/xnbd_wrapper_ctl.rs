use std::path::Path;

use xnbd_api::{config::VolumeExport, constants::XNBD_WRAPPER_CTL};

use crate::exe::ExternalCommand;

fn control(socket: impl AsRef<Path>) -> ExternalCommand {
    ExternalCommand::new(XNBD_WRAPPER_CTL)
        .arg("--socket")
        .arg(socket.as_ref())
}

/// Registers `export` with the running wrapper.
pub fn add_target(socket: impl AsRef<Path>, export: &VolumeExport) -> ExternalCommand {
    control(socket)
        .arg("--add-target")
        .arg(&export.name)
        .arg(&export.path)
}

/// Shuts the wrapper down along with every export it serves.
pub fn shutdown(socket: impl AsRef<Path>) -> ExternalCommand {
    control(socket).arg("--shutdown")
}

/// Lists the exports of the running wrapper.
pub fn list(socket: impl AsRef<Path>) -> ExternalCommand {
    control(socket).arg("-l")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_commands() {
        let export = VolumeExport {
            name: "a".into(),
            path: "/srv/a.img".into(),
        };
        assert_eq!(
            add_target("/tmp/s", &export).render(),
            "xnbd-wrapper-ctl --socket /tmp/s --add-target a /srv/a.img"
        );
        assert_eq!(
            shutdown("/tmp/s").render(),
            "xnbd-wrapper-ctl --socket /tmp/s --shutdown"
        );
        assert_eq!(list("/tmp/s").render(), "xnbd-wrapper-ctl --socket /tmp/s -l");
    }
}
