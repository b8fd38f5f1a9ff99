use const_format::formatcp;

// Configuration keys

/// Key of the wrapper daemon object.
pub const WRAPPER_KEY: &str = "wrapper";

/// Deprecated key of the wrapper daemon object, renamed to `wrapper`.
pub const LEGACY_WRAPPER_KEY: &str = "server";

/// Prefix shared by all client device keys, e.g. `nbd0`.
pub const DEVICE_PREFIX: &str = "nbd";

/// Pattern a client device key must match in full.
pub const DEVICE_NAME_PATTERN: &str = formatcp!("^{DEVICE_PREFIX}[0-9]+$");

/// Client option holding the server host.
pub const CLIENT_HOST_KEY: &str = "host";

/// Client option holding the server port.
pub const CLIENT_PORT_KEY: &str = "port";

/// Client option holding the remote export name.
pub const CLIENT_NAME_KEY: &str = "name";

pub const WRAPPER_ADDRESS_KEY: &str = "address";
pub const WRAPPER_LOGPATH_KEY: &str = "logpath";
pub const WRAPPER_PORT_KEY: &str = "port";
pub const WRAPPER_SOCKET_KEY: &str = "socket";
pub const WRAPPER_MAX_BUF_SIZE_KEY: &str = "max_buf_size";
pub const WRAPPER_MAX_QUEUE_SIZE_KEY: &str = "max_queue_size";
pub const WRAPPER_VOLUMES_KEY: &str = "volumes";

/// Every option recognized inside the wrapper object.
pub const WRAPPER_OPTIONS: [&str; 7] = [
    WRAPPER_ADDRESS_KEY,
    WRAPPER_LOGPATH_KEY,
    WRAPPER_MAX_BUF_SIZE_KEY,
    WRAPPER_MAX_QUEUE_SIZE_KEY,
    WRAPPER_PORT_KEY,
    WRAPPER_SOCKET_KEY,
    WRAPPER_VOLUMES_KEY,
];

// Wrapper defaults

/// Address the wrapper listens on when none is configured.
pub const DEFAULT_WRAPPER_ADDRESS: &str = "127.0.0.1";

/// Port the wrapper listens on when none is configured.
pub const DEFAULT_WRAPPER_PORT: u16 = 8520;

/// Log file of the wrapper when none is configured.
pub const DEFAULT_WRAPPER_LOGPATH: &str = "/var/log/xnbd.log";

/// Control socket of the wrapper when none is configured.
pub const DEFAULT_WRAPPER_SOCKET: &str = "/var/run/xnbd-wrapper.ctl";

// External tools

/// NBD client tool.
pub const XNBD_CLIENT: &str = "xnbd-client";

/// Multiplexing wrapper daemon.
pub const XNBD_WRAPPER: &str = "xnbd-wrapper";

/// Control tool of the wrapper daemon.
pub const XNBD_WRAPPER_CTL: &str = "xnbd-wrapper-ctl";

/// Directory holding the block device nodes.
pub const DEVICE_DIRECTORY: &str = "/dev";

// Paths

/// Configuration file read when none is given on the command line.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/xnbd.conf";

/// Character starting a comment in the configuration file.
pub const COMMENT_CHARACTER: char = '#';

/// Exit code reported for a command that could not be launched at all.
pub const COMMAND_NOT_FOUND_CODE: i32 = 127;
