//! Campus command - List campuses.

use anyhow::Result;

use crate::context::Context;
use crate::output;

pub async fn execute(ctx: &Context) -> Result<()> {
    let campuses = ctx.client.campuses().list().await?;
    if ctx.json {
        return output::print_json(&campuses);
    }

    for campus in campuses {
        println!("{:>4}  {}", campus.campus_id, campus.campus_name);
    }
    Ok(())
}
