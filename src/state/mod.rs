// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state: raw snapshots and the rate-limited cache.

mod cache;
mod snapshot;

pub use cache::StateCache;
pub use snapshot::DeviceSnapshot;
