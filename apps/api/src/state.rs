use cartera_application::DashboardService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub dashboard_service: DashboardService,
}
