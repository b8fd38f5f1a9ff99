use xnbd_api::{config::WrapperSpec, constants::XNBD_WRAPPER};

use crate::exe::ExternalCommand;

/// Launches the wrapper daemon. The command returns once the daemon has forked and its control
/// socket is ready.
pub fn start(wrapper: &WrapperSpec) -> ExternalCommand {
    let mut command = ExternalCommand::new(XNBD_WRAPPER)
        .arg("--daemonize")
        .arg("--logpath")
        .arg(&wrapper.logpath)
        .arg("--laddr")
        .arg(&wrapper.address)
        .arg("--port")
        .arg(wrapper.port.to_string())
        .arg("--socket")
        .arg(&wrapper.socket);

    for (parameter, size) in [
        ("--max-queue-size", wrapper.max_queue_size),
        ("--max-buf-size", wrapper.max_buf_size),
    ] {
        if let Some(size) = size {
            command = command.arg(parameter).arg(size.to_string());
        }
    }

    command
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_defaults() {
        assert_eq!(
            start(&WrapperSpec::default()).render(),
            "xnbd-wrapper --daemonize --logpath /var/log/xnbd.log --laddr 127.0.0.1 \
            --port 8520 --socket /var/run/xnbd-wrapper.ctl"
        );
    }

    #[test]
    fn test_start_with_sizes() {
        let wrapper = WrapperSpec {
            address: "0.0.0.0".into(),
            port: 9520,
            logpath: "/tmp/xnbd.log".into(),
            socket: "/tmp/s".into(),
            max_buf_size: Some(4096),
            max_queue_size: Some(16),
            ..Default::default()
        };
        assert_eq!(
            start(&wrapper).render(),
            "xnbd-wrapper --daemonize --logpath /tmp/xnbd.log --laddr 0.0.0.0 --port 9520 \
            --socket /tmp/s --max-queue-size 16 --max-buf-size 4096"
        );

        let wrapper = WrapperSpec {
            max_queue_size: None,
            ..wrapper
        };
        assert!(start(&wrapper).render().ends_with("--socket /tmp/s --max-buf-size 4096"));
    }
}
