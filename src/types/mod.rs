// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Custom resource types: the Cakephp instance and the OpenShift Route it owns.

pub mod cakephp;
pub mod route;

pub use cakephp::{Cakephp, CakephpSpec, CakephpStatus, Tier};
pub use route::{Route, RouteSpec, RouteTargetReference};
