//! Register commands: `\count`, `\dimen`, `\skip`, `\muskip`, `\countdef`,
//! and the named mu-glue registers.

use mathlang::command::Command;
use mathlang::parse;
use mathlang::prelude::*;
use mathlang::variable::{Index, VariableCommand};
use units::{MuDimen, MuGlue, Value as RegisterValue, UNITY};

/// Get the `\count` command.
pub fn get_count() -> Command {
    Command::Variable(VariableCommand::Count(Index::Scan))
}

/// Get the `\dimen` command.
pub fn get_dimen() -> Command {
    Command::Variable(VariableCommand::Dimen(Index::Scan))
}

/// Get the `\skip` command.
pub fn get_skip() -> Command {
    Command::Variable(VariableCommand::Skip(Index::Scan))
}

/// Get the `\muskip` command.
pub fn get_muskip() -> Command {
    Command::Variable(VariableCommand::MuSkip(Index::Scan))
}

/// Get the `\countdef` command, which binds an integer register to a
/// control sequence.
pub fn get_countdef() -> Command {
    Command::new_execution(countdef_fn)
}

fn countdef_fn(_: Token, engine: &mut Engine) -> bool {
    let scope = engine.take_global();
    let Some(target) = engine.next_token(Context::Default) else {
        return false;
    };
    let Value::CommandRef(command_ref) = target.value() else {
        return false;
    };
    parse::scan_optional_equals(engine);
    let Some(index) = parse::scan_int(engine) else {
        return false;
    };
    let Ok(index) = u16::try_from(index.get()) else {
        return false;
    };
    engine.scopes.define(
        command_ref,
        Command::Variable(VariableCommand::Count(Index::Fixed(index))),
        scope,
    );
    true
}

// Slots for the named value registers.
const THINMUSKIP_SLOT: u16 = 0;
const MEDMUSKIP_SLOT: u16 = 1;
const THICKMUSKIP_SLOT: u16 = 2;

/// Get the `\thinmuskip` register (3mu by default).
pub fn get_thinmuskip() -> Command {
    Command::Variable(VariableCommand::Named {
        slot: THINMUSKIP_SLOT,
        default: RegisterValue::MuGlue(MuGlue::from_mu_dimen(MuDimen::new(3 * UNITY))),
    })
}

/// Get the `\medmuskip` register (4mu plus 2mu minus 4mu by default).
pub fn get_medmuskip() -> Command {
    Command::Variable(VariableCommand::Named {
        slot: MEDMUSKIP_SLOT,
        default: RegisterValue::MuGlue(MuGlue {
            start: MuDimen::new(4 * UNITY),
            stretch: MuDimen::new(2 * UNITY),
            shrink: MuDimen::new(4 * UNITY),
            ..Default::default()
        }),
    })
}

/// Get the `\thickmuskip` register (5mu plus 5mu by default).
pub fn get_thickmuskip() -> Command {
    Command::Variable(VariableCommand::Named {
        slot: THICKMUSKIP_SLOT,
        default: RegisterValue::MuGlue(MuGlue {
            start: MuDimen::new(5 * UNITY),
            stretch: MuDimen::new(5 * UNITY),
            ..Default::default()
        }),
    })
}

#[cfg(test)]
mod tests {
    use mathlang_testing::*;

    fn built_in_commands() -> std::collections::HashMap<&'static str, mathlang::command::Command> {
        crate::built_in_commands()
    }

    test_suite![
        tree_equality_tests(
            (write_and_read_count, r"\count0=4 \the\count0", "4"),
            (write_and_read_count_no_equals, r"\count0 4 \the\count0", "4"),
            (unset_count_is_zero, r"\the\count7", "0"),
            (
                count_assignment_is_local_to_group,
                r"\count0=5{\count0=7}\the\count0",
                "5"
            ),
            (
                global_count_assignment_survives_group,
                r"\count0=5{\global\count0=7}\the\count0",
                "7"
            ),
            (
                count_from_count,
                r"\count1=5 \count0=\count1 \the\count0",
                "5"
            ),
            (negative_count, r"\count0=-4 \the\count0", "-4"),
            (countdef_binds_register, r"\countdef\A=7 \A=4 \the\count7", "4"),
            (
                countdef_read_back,
                r"\countdef\A=7 \count7=9 \the\A",
                "9"
            ),
            (
                dimen_read_back,
                r"\dimen0=1.5pt \the\dimen0",
                "1.5pt"
            ),
            (
                dimen_from_count_factor,
                r"\count1=3 \dimen0=\count1pt \the\dimen0",
                "3.0pt"
            ),
            (
                dimen_register_as_unit,
                r"\dimen1=10pt \dimen0=1.5\dimen1 \the\dimen0",
                "15.0pt"
            ),
            (
                skip_with_stretch,
                r"\skip0=1pt plus 2pt \the\skip0",
                "1.0pt plus 2.0pt"
            ),
            (
                muskip_read_back,
                r"\muskip0=3mu \the\muskip0",
                "3.0mu"
            ),
            (thinmuskip_default, r"\the\thinmuskip", "3.0mu"),
            (
                thinmuskip_assignment,
                r"\thinmuskip=4mu \the\thinmuskip",
                "4.0mu"
            ),
        ),
        invalid_token_tests(
            (count_index_missing, r"\count=4 x", 1),
            (countdef_without_target, r"\countdef 7 x", 1),
        ),
    ];
}
