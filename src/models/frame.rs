// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Compiled-in dashboard frame configuration.
//!
//! The dashboard embeds a fixed set of third-party tracking pages. The list
//! is static configuration: no persistence, no runtime mutation, ordering is
//! the display order.

use serde::Serialize;

/// One embedded tracking frame.
#[derive(Debug, Clone, Serialize)]
pub struct Frame {
    pub id: u32,
    pub title: &'static str,
    pub url: &'static str,
}

/// The dashboard's frames, in display order.
pub const DASHBOARD_FRAMES: &[Frame] = &[
    Frame {
        id: 1,
        title: "Baja Score",
        url: "https://score-raceinfo.com/58th-baja-1000-nov-10-16-2025/",
    },
    Frame {
        id: 2,
        title: "DK",
        url: "https://share.garmin.com/share/summitandthrottle",
    },
    Frame {
        id: 3,
        title: "Ashish",
        url: "https://share.garmin.com/Z45AN",
    },
    Frame {
        id: 4,
        title: "Rajiv",
        url: "https://share.garmin.com/NXN7O",
    },
];
