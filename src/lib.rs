// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod cli;
pub mod commands;
pub mod crm;
pub mod db;
pub mod documents;
pub mod error;
pub mod journal;
pub mod models;
pub mod reports;
pub mod repo;
pub mod utils;
pub mod validation;
