// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

pub mod check;
pub mod run;
pub mod show_config;

pub use check::check_command;
pub use run::run_command;
pub use show_config::show_config_command;
