// DOM hooks shared by the markup builder and the event wiring.

// Containers
pub const SIDEBAR_ID: &str = "zethus-sidebar"; // re-rendered on every configuration change
pub const ERROR_OVERLAY_ID: &str = "zethus-error"; // hidden until a handler fails
pub const ERROR_MESSAGE_ID: &str = "zethus-error-message";
pub const ERROR_RESET_ID: &str = "zethus-error-reset";

// Controls
pub const ROS_ENDPOINT_ID: &str = "ros-endpoint";

// `data-action` values on buttons inside the sidebar
pub const ACTION_ADD_PATH: &str = "add-path";
pub const ACTION_REMOVE: &str = "remove";
pub const ACTION_TOGGLE: &str = "toggle";

// Visualization type created by the "add path" button
pub const PATH_VIZ_TYPE: &str = "Path";

// Host-supplied configuration, read once at start
pub const HOST_CONFIG_PROPERTY: &str = "zethusConfiguration";
