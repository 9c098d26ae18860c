// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Point colors and random color generation

use rand::Rng;
use serde::{Deserialize, Serialize};

/// 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<[u8; 4]> for Rgba {
    fn from(c: [u8; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }
}

/// Random opaque color.
///
/// With `light_only` the brightest channel is pushed to 255 so components stay
/// readable on a dark background.
pub fn random_color<R: Rng + ?Sized>(rng: &mut R, light_only: bool) -> Rgba {
    let mut channels: [u8; 3] = [rng.gen(), rng.gen(), rng.gen()];

    if light_only {
        let brightest = channels.iter().copied().max().unwrap_or(0);
        if brightest == 0 {
            channels = [255, 255, 255];
        } else {
            let factor = 255.0 / brightest as f32;
            for c in &mut channels {
                *c = (*c as f32 * factor).round().min(255.0) as u8;
            }
        }
    }

    Rgba::rgb(channels[0], channels[1], channels[2])
}
