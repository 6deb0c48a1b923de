//! Student lookup.

use anyhow::Result;
use clap::Subcommand;

use crate::context::Context;
use crate::output;

#[derive(Subcommand)]
pub enum StudentCommand {
    /// Search students by name, code or email
    Search {
        keyword: String,

        /// Only students without a team
        #[arg(long)]
        available: bool,
    },
}

pub async fn execute(command: StudentCommand, ctx: &Context) -> Result<()> {
    match command {
        StudentCommand::Search { keyword, available } => {
            ctx.client.require_session()?;
            let mut students = ctx.client.users().search(keyword.trim()).await?;
            if available {
                students.retain(|s| !s.has_team);
            }

            if ctx.json {
                return output::print_json(&students);
            }
            if students.is_empty() {
                println!("No students match \"{}\".", keyword.trim());
            }
            for student in students {
                println!(
                    "{:>5}  {:<10} {:<24} {}{}",
                    student.user_id,
                    output::or_dash(student.student_code.as_deref()),
                    student.full_name,
                    student.email,
                    if student.has_team { "  (in a team)" } else { "" }
                );
            }
        }
    }
    Ok(())
}
