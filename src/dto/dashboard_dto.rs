use serde::Serialize;

use crate::services::fleet_aggregator::FleetView;

// Response del dashboard: mientras alguna colección siga vacía la vista
// está en carga y no se expone nada derivado
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub loading: bool,
    pub view: Option<FleetView>,
}

impl DashboardResponse {
    pub fn from_view(view: Option<FleetView>) -> Self {
        Self {
            loading: view.is_none(),
            view,
        }
    }
}
