use serde::Serialize;

/// Icon drawn next to a dashboard link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NavIcon {
    Dashboard,
    AssetList,
    AddAsset,
    Requests,
    Employees,
    Upgrade,
    Profile,
    MyAssets,
    RequestAsset,
    Team,
}

/// One entry of a dashboard link set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub path: &'static str,
    pub label: &'static str,
    pub icon: NavIcon,
}

impl NavLink {
    pub const fn new(path: &'static str, label: &'static str, icon: NavIcon) -> Self {
        Self { path, label, icon }
    }
}
