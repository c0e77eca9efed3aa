//! Default TOML config template with inline documentation comments.

pub(crate) fn default_config_toml() -> String {
    r##"# CoconutWax Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[server]
# host = "127.0.0.1"          # loopback only
# port = 2023
# content_dir = "assets/wax-web"

[content]
# source = "auto"             # auto, filesystem, network
# base_url = "http://127.0.0.1:8000/"   # required for network

[display]
# use_custom_user_agent = false
# callback_timeout_secs = 0   # 0 = wait until the surface closes
# width = 1280
# height = 800
#
# [[display.user_agents]]
# platform = "android"        # std::env::consts::OS name
# user_agent = "Mozilla/5.0 (Linux; Android 13) Mobile"

[remote]
# atomic_assets_url = "https://wax.api.atomicassets.io/"
# image_base_url = "https://ipfs.io/ipfs/"
# request_timeout_secs = 30   # 1-600

[logging]
# level = "info"              # off, error, warn, info, debug, trace
"##
    .to_string()
}
