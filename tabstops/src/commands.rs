//! User-facing conversion commands.
//!
//! Each command works on one buffer and resolves the buffer's tabstop from
//! configuration unless one is passed explicitly. Lifecycle hooks use the
//! same commands.

use crate::{
    buffer::BufferId,
    config::{BufferConfig, Defaults},
    convert,
    dispatch::DispatchError,
    host::Host,
    policy::{self, Direction},
};

fn tabstop_for<H: Host>(
    host: &H,
    id: BufferId,
    defaults: &Defaults,
    tabstop: Option<usize>,
) -> Result<usize, DispatchError> {
    match tabstop {
        Some(tabstop) => Ok(tabstop),
        None => Ok(BufferConfig::resolve(host, id, defaults)?.tabstop),
    }
}

pub fn convert_tabs_to_spaces<H: Host>(
    host: &mut H,
    id: BufferId,
    defaults: &Defaults,
    tabstop: Option<usize>,
) -> Result<usize, DispatchError> {
    let tabstop = tabstop_for(host, id, defaults, tabstop)?;
    Ok(convert::tabs_to_spaces(host, id, tabstop)?)
}

pub fn convert_spaces_to_tabs<H: Host>(
    host: &mut H,
    id: BufferId,
    defaults: &Defaults,
    tabstop: Option<usize>,
) -> Result<usize, DispatchError> {
    let tabstop = tabstop_for(host, id, defaults, tabstop)?;
    Ok(convert::spaces_to_tabs(host, id, tabstop)?)
}

/// Convert whichever way the buffer's leading indentation calls for.
///
/// Leading tabs win over space runs. Returns `None` without touching the
/// buffer when neither is present.
pub fn toggle_conversion<H: Host>(
    host: &mut H,
    id: BufferId,
    defaults: &Defaults,
) -> Result<Option<(Direction, usize)>, DispatchError> {
    let tabstop = tabstop_for(host, id, defaults, None)?;
    let direction = host
        .inspect(id, |buffer| policy::toggle_direction(buffer, tabstop))
        .map_err(|source| convert::ConvertError::Edit { id, source })?;

    let Some(direction) = direction else {
        tracing::debug!("No tabstops found in {id}");
        return Ok(None);
    };

    let count = convert::convert(host, id, direction, tabstop)?;
    Ok(Some((direction, count)))
}
