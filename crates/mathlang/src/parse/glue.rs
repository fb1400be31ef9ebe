//! Glue scanning.
//!
//! A glue value is a dimension optionally followed by `plus <stretch>` and
//! `minus <shrink>`, where the stretch and shrink may be infinite
//! (`<factor> fil`, `fill` or `filll`).

use crate::command::Command;
use crate::engine::Engine;
use crate::expand::next_expanded;
use crate::mouth::Context;
use crate::token::Value as TokenValue;
use crate::variable;
use units::{Dimen, Glue, GlueOrder, MuDimen, MuGlue, Value};

/// Scans a glue value, or returns [None] leaving the mouth unchanged.
pub fn scan_glue(engine: &mut Engine) -> Option<Glue> {
    let checkpoint = engine.mouth.checkpoint();
    match scan_glue_inner(engine) {
        Some(g) => Some(g),
        None => {
            engine.mouth.rewind(checkpoint);
            None
        }
    }
}

/// Scans a mu-glue value, or returns [None] leaving the mouth unchanged.
pub fn scan_mu_glue(engine: &mut Engine) -> Option<MuGlue> {
    let checkpoint = engine.mouth.checkpoint();
    match scan_mu_glue_inner(engine) {
        Some(g) => Some(g),
        None => {
            engine.mouth.rewind(checkpoint);
            None
        }
    }
}

fn scan_glue_inner(engine: &mut Engine) -> Option<Glue> {
    let mut glue = match scan_glue_register(engine) {
        Some(g) => g,
        None => Glue::from_dimen(super::scan_dimen(engine)?),
    };
    if super::scan_keyword(engine, "plus") {
        match scan_stretch(engine) {
            Some((stretch, order)) => {
                glue.stretch = stretch;
                glue.stretch_order = order;
            }
            None => return None,
        }
    }
    if super::scan_keyword(engine, "minus") {
        match scan_stretch(engine) {
            Some((shrink, order)) => {
                glue.shrink = shrink;
                glue.shrink_order = order;
            }
            None => return None,
        }
    }
    Some(glue)
}

fn scan_mu_glue_inner(engine: &mut Engine) -> Option<MuGlue> {
    let mut glue = match scan_mu_glue_register(engine) {
        Some(g) => g,
        None => MuGlue::from_mu_dimen(super::scan_mu_dimen(engine)?),
    };
    if super::scan_keyword(engine, "plus") {
        match scan_mu_stretch(engine) {
            Some((stretch, order)) => {
                glue.stretch = stretch;
                glue.stretch_order = order;
            }
            None => return None,
        }
    }
    if super::scan_keyword(engine, "minus") {
        match scan_mu_stretch(engine) {
            Some((shrink, order)) => {
                glue.shrink = shrink;
                glue.shrink_order = order;
            }
            None => return None,
        }
    }
    Some(glue)
}

/// A stretch or shrink: a dimension, or a factor with a fil-order unit.
fn scan_stretch(engine: &mut Engine) -> Option<(Dimen, GlueOrder)> {
    if let Some((magnitude, order)) = scan_fil(engine) {
        return Some((Dimen { sp: magnitude, em: 0 }, order));
    }
    super::scan_dimen(engine).map(|d| (d, GlueOrder::Normal))
}

fn scan_mu_stretch(engine: &mut Engine) -> Option<(MuDimen, GlueOrder)> {
    if let Some((magnitude, order)) = scan_fil(engine) {
        return Some((MuDimen::new(magnitude), order));
    }
    super::scan_mu_dimen(engine).map(|d| (d, GlueOrder::Normal))
}

/// Scans `<signed factor> fil`, `fill` or `filll`.
fn scan_fil(engine: &mut Engine) -> Option<(i64, GlueOrder)> {
    let checkpoint = engine.mouth.checkpoint();
    let result = (|| {
        let negative = super::scan_optional_signs(engine);
        let factor = super::scan_factor(engine)?;
        if !super::scan_keyword(engine, "fil") {
            return None;
        }
        let mut order = GlueOrder::Fil;
        while super::scan_keyword(engine, "l") {
            order = match order {
                GlueOrder::Fil => GlueOrder::Fill,
                _ => GlueOrder::Filll,
            };
        }
        super::scan_optional_space(engine);
        Some((if negative { -factor } else { factor }, order))
    })();
    if result.is_none() {
        engine.mouth.rewind(checkpoint);
    }
    result
}

fn scan_glue_register(engine: &mut Engine) -> Option<Glue> {
    let checkpoint = engine.mouth.checkpoint();
    let result = (|| {
        let negative = super::scan_optional_signs(engine);
        let token = next_expanded(engine, Context::Default)?;
        let TokenValue::CommandRef(command_ref) = token.value() else {
            return None;
        };
        let Command::Variable(cmd) = engine.resolve_command(&command_ref)? else {
            return None;
        };
        match variable::read(engine, &cmd)? {
            Value::Glue(g) => Some(if negative {
                Glue {
                    start: -g.start,
                    stretch: -g.stretch,
                    stretch_order: g.stretch_order,
                    shrink: -g.shrink,
                    shrink_order: g.shrink_order,
                }
            } else {
                g
            }),
            _ => None,
        }
    })();
    if result.is_none() {
        engine.mouth.rewind(checkpoint);
    }
    result
}

fn scan_mu_glue_register(engine: &mut Engine) -> Option<MuGlue> {
    let checkpoint = engine.mouth.checkpoint();
    let result = (|| {
        let negative = super::scan_optional_signs(engine);
        let token = next_expanded(engine, Context::Default)?;
        let TokenValue::CommandRef(command_ref) = token.value() else {
            return None;
        };
        let Command::Variable(cmd) = engine.resolve_command(&command_ref)? else {
            return None;
        };
        match variable::read(engine, &cmd)? {
            Value::MuGlue(g) => Some(if negative {
                MuGlue {
                    start: -g.start,
                    stretch: -g.stretch,
                    stretch_order: g.stretch_order,
                    shrink: -g.shrink,
                    shrink_order: g.shrink_order,
                }
            } else {
                g
            }),
            _ => None,
        }
    })();
    if result.is_none() {
        engine.mouth.rewind(checkpoint);
    }
    result
}
