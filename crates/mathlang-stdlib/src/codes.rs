//! Code-table commands: `\catcode`, `\mathcode`, `\lccode`, `\uccode`.

use mathlang::command::Command;
use mathlang::variable::VariableCommand;

/// Get the `\catcode` command.
pub fn get_catcode() -> Command {
    Command::Variable(VariableCommand::CatCode)
}

/// Get the `\mathcode` command.
pub fn get_mathcode() -> Command {
    Command::Variable(VariableCommand::MathCode)
}

/// Get the `\lccode` command.
pub fn get_lccode() -> Command {
    Command::Variable(VariableCommand::LcCode)
}

/// Get the `\uccode` command.
pub fn get_uccode() -> Command {
    Command::Variable(VariableCommand::UcCode)
}

#[cfg(test)]
mod tests {
    use mathlang_testing::*;

    fn built_in_commands() -> std::collections::HashMap<&'static str, mathlang::command::Command> {
        crate::built_in_commands()
    }

    test_suite![
        tree_equality_tests(
            (read_catcode_of_letter, r"\the\catcode`\a", "11"),
            (read_catcode_of_brace, r"\the\catcode`\{", "1"),
            (
                assign_catcode,
                // Making @ a letter allows it in control sequence names.
                r"\catcode`\@=11 \def\a@b{x}\a@b",
                "x"
            ),
            (
                catcode_assignment_is_local,
                r"{\catcode`\@=11 }\the\catcode`\@",
                "12"
            ),
            (
                global_catcode_assignment,
                r"{\global\catcode`\@=11 }\the\catcode`\@",
                "11"
            ),
            (read_mathcode, r"\the\mathcode`\+", "2"),
            (
                assign_mathcode,
                r"\mathcode`\q=1 \the\mathcode`\q",
                "1"
            ),
            (read_lccode, r"\the\lccode`\A", "97"),
            (
                assign_uccode,
                r"\uccode`\x=`\y \uppercase{x}",
                "y"
            ),
        ),
    ];
}
