// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// The operator name used as field manager for writes
pub const OPERATOR_NAME: &str = "cakephp-operator";

/// Finalizer guarding explicit cascade deletion of managed resources
pub const FINALIZER: &str = "cakephp.example.com/cascade-cleanup";

/// Label keys and fixed values shared by every managed resource
pub mod labels {
    pub const APP: &str = "app";
    pub const APP_VALUE: &str = "Demo";
    /// Holds the owning Cakephp instance name
    pub const INSTANCE: &str = "demosite_cr";
    pub const TIER: &str = "tier";
}

/// The database (prerequisite) group. Names are fixed per namespace.
pub mod mysql {
    pub const AUTH_SECRET_NAME: &str = "mysql-auth";
    pub const DEPLOYMENT_NAME: &str = "mysql";
    pub const SERVICE_NAME: &str = "mysql";
    pub const IMAGE: &str = "mysql:5.7";
    pub const CONTAINER_NAME: &str = "mysql-server";
    pub const PORT_NAME: &str = "mysql";
    pub const PORT: i32 = 3306;
    pub const VOLUME_NAME: &str = "mysql-data";
    pub const DATA_PATH: &str = "/var/lib/mysql";
    pub const DATABASE: &str = "cakephp";
    pub const USERNAME: &str = "root";
    pub const PASSWORD: &str = "cakephp";
    /// Keys of the credential object
    pub const USERNAME_KEY: &str = "username";
    pub const PASSWORD_KEY: &str = "password";
}

/// The application (dependent) group. Names are derived from the instance name.
pub mod demo {
    pub const DEPLOYMENT_SUFFIX: &str = "-deployment";
    pub const SERVICE_SUFFIX: &str = "-service";
    pub const IMAGE: &str = "quay.io/rocrisp/cakedemo:v1";
    pub const CONTAINER_NAME: &str = "cakephp-demo";
    pub const PORT_NAME: &str = "cakephp";
    pub const PORT: i32 = 8080;
    pub const SERVICE_PORT: i32 = 5000;
    /// Environment entry carrying the instance title
    pub const TITLE_ENV: &str = "FIRST_LASTNAME";
}

/// Requeue timing
pub mod requeue {
    /// Delay while waiting for the database workload to become ready
    pub const PREREQUISITE_WAIT_SECS: u64 = 5;
    /// Backoff applied by the controller error policy
    pub const ERROR_BACKOFF_SECS: u64 = 60;
}

/// CRD polling configuration
pub mod crd {
    /// Initial polling interval in seconds when waiting for CRD
    pub const POLL_INTERVAL_SECS: u64 = 10;
    /// Maximum polling interval in seconds (exponential backoff cap)
    pub const POLL_MAX_INTERVAL_SECS: u64 = 60;
}
