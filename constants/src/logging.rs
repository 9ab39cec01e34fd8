/// Default tracing filter applied by the log plugin.
pub const LOG_FILTER: &str = "info,wgpu=error,naga=warn,car_viewer_engine=debug";
