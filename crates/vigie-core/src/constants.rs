/// Route component constants shared across crates
pub const API_ROUTE_COMPONENT: &str = "api";
pub const API_ROUTE_PREFIX: &str = const_str::concat!("/", API_ROUTE_COMPONENT);

pub const APP_ROUTE_COMPONENT: &str = "app";

pub const SITE_ROUTE_COMPONENT: &str = "sites";
pub const SITE_ROUTE_PREFIX: &str = const_str::concat!(API_ROUTE_PREFIX, "/", SITE_ROUTE_COMPONENT);

pub const BUILDING_ROUTE_COMPONENT: &str = "buildings";
pub const BUILDING_ROUTE_PREFIX: &str =
    const_str::concat!(API_ROUTE_PREFIX, "/", BUILDING_ROUTE_COMPONENT);

pub const LEVEL_ROUTE_COMPONENT: &str = "levels";
pub const LEVEL_ROUTE_PREFIX: &str =
    const_str::concat!(API_ROUTE_PREFIX, "/", LEVEL_ROUTE_COMPONENT);

pub const PART_ROUTE_COMPONENT: &str = "parts";
pub const PART_ROUTE_PREFIX: &str = const_str::concat!(API_ROUTE_PREFIX, "/", PART_ROUTE_COMPONENT);

/// Header carrying the upstream-authenticated principal email in proxy mode.
pub const DEFAULT_PROXY_HEADER: &str = "x-remote-user";

/// Maximum number of parent hops from any node to its site.
pub const MAX_ANCESTOR_HOPS: usize = 3;
