/// Requests arriving from the background services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Show,
    ShowBuild,
    Hide,
    ConfigReload,
}
