// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::path::PathBuf;

use anyhow::{Context, Result};

/// Environment variable overriding where the bridge config is read from.
pub const CONFIG_ENV: &str = "POOL_BRIDGE_CONFIG";

/// Resolves the configuration path: an explicit `POOL_BRIDGE_CONFIG`
/// environment variable wins, otherwise `rel` is taken relative to the
/// working directory.
pub fn resolve_config_path(rel: &str) -> Result<PathBuf> {
    let p = std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(rel));

    let abs = if p.is_absolute() {
        p
    } else {
        std::env::current_dir()
            .context("cannot get current working dir")?
            .join(p)
    };

    abs.canonicalize()
        .with_context(|| format!("failed to canonicalize path {abs:?}"))
}
