// Copyright 2025 the Quadrant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Literal-or-callback configuration values.

use alloc::sync::Arc;
use core::fmt;

use quadrant_surface::Attrs;

/// A configuration value that is either a literal or computed from a context on demand.
///
/// Computed values are resolved each time they are read, so a callback observes the context
/// of the render pass that asks for it.
pub enum Setting<T, C: ?Sized = ()> {
    /// A literal value.
    Value(T),
    /// A callback invoked with the resolution context.
    Computed(Arc<dyn Fn(&C) -> T>),
}

impl<T, C: ?Sized> Setting<T, C> {
    /// Wraps a callback.
    pub fn computed(f: impl Fn(&C) -> T + 'static) -> Self {
        Self::Computed(Arc::new(f))
    }

    /// Returns the literal value, or `None` for a callback.
    pub fn as_value(&self) -> Option<&T> {
        match self {
            Self::Value(v) => Some(v),
            Self::Computed(_) => None,
        }
    }

    /// Returns `true` if this setting is a callback.
    pub fn is_computed(&self) -> bool {
        matches!(self, Self::Computed(_))
    }
}

impl<T: Clone, C: ?Sized> Setting<T, C> {
    /// Returns the literal, or invokes the callback with `ctx`.
    pub fn resolve(&self, ctx: &C) -> T {
        match self {
            Self::Value(v) => v.clone(),
            Self::Computed(f) => f(ctx),
        }
    }
}

impl<T, C: ?Sized> From<T> for Setting<T, C> {
    fn from(value: T) -> Self {
        Self::Value(value)
    }
}

impl<T: Clone, C: ?Sized> Clone for Setting<T, C> {
    fn clone(&self) -> Self {
        match self {
            Self::Value(v) => Self::Value(v.clone()),
            Self::Computed(f) => Self::Computed(Arc::clone(f)),
        }
    }
}

impl<T: Default, C: ?Sized> Default for Setting<T, C> {
    fn default() -> Self {
        Self::Value(T::default())
    }
}

impl<T: fmt::Debug, C: ?Sized> fmt::Debug for Setting<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::Computed(_) => f.write_str("Computed(<fn>)"),
        }
    }
}

/// Outcome of a per-element customization hook.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Customize<T = Attrs> {
    /// Do not draw the element; anything already created for it is removed.
    Skip,
    /// Draw the element with this value in place of the default.
    Replace(T),
    /// Draw the element with its default value.
    #[default]
    UseDefault,
}

impl<T> Customize<T> {
    /// Returns `true` for [`Customize::Skip`].
    pub fn is_skip(&self) -> bool {
        matches!(self, Self::Skip)
    }

    /// Returns the replacement value, falling back to `default`; `None` for `Skip`.
    pub fn or_default(self, default: T) -> Option<T> {
        match self {
            Self::Skip => None,
            Self::Replace(v) => Some(v),
            Self::UseDefault => Some(default),
        }
    }
}
