//! Route paths, storage folders and endpoint paths.

/// Login route; unauthenticated dashboard requests land here.
pub const LOGIN_ROUTE: &str = "/login";
/// Dashboard root.
pub const DASHBOARD_ROOT: &str = "/dashboard";
/// Generic "home" alias under the dashboard, resolved per role.
pub const DASHBOARD_HOME_ALIAS: &str = "/dashboard/home";

pub const HR_HOME_ROUTE: &str = "/dashboard/hr-home";
pub const EMPLOYEE_HOME_ROUTE: &str = "/dashboard/employee-home";

// HR feature routes
pub const ASSET_LIST_ROUTE: &str = "/dashboard/asset-list";
pub const ADD_ASSET_ROUTE: &str = "/dashboard/add-asset";
pub const ALL_REQUESTS_ROUTE: &str = "/dashboard/all-requests";
pub const EMPLOYEE_LIST_ROUTE: &str = "/dashboard/employee-list";
pub const UPGRADE_PACKAGE_ROUTE: &str = "/dashboard/upgrade-package";

// Employee feature routes
pub const MY_ASSETS_ROUTE: &str = "/dashboard/my-assets";
pub const REQUEST_ASSET_ROUTE: &str = "/dashboard/request-asset";
pub const MY_TEAM_ROUTE: &str = "/dashboard/my-team";

pub const PROFILE_ROUTE: &str = "/dashboard/profile";

/// Backend endpoint issuing upload signature grants.
pub const SIGNATURE_PATH: &str = "/api/upload/signature";
/// Backend endpoint ensuring the canonical storage folders exist.
pub const INIT_FOLDERS_PATH: &str = "/api/upload/init-folders";

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";
pub const DEFAULT_MEDIA_HOST_URL: &str = "https://api.cloudinary.com/v1_1";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;

/// Fallback messages used when a remote error carries no detail.
pub const GENERIC_SIGNATURE_ERROR: &str = "Failed to get upload signature";
pub const GENERIC_UPLOAD_ERROR: &str = "Upload failed";
pub const GENERIC_FOLDER_INIT_ERROR: &str = "Failed to initialize folders";
