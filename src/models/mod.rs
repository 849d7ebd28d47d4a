// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod activity;
pub mod frame;
pub mod user;

pub use activity::{Activity, Coordinate, Device, Location};
pub use frame::Frame;
pub use user::UserInfo;
