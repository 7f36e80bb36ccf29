//! Parameter listing command.

#![allow(clippy::print_literal)] // Table headers use literal strings intentionally

use clap::Args;
use consumer_synth::{ChannelParameters, ParameterInfo};

#[derive(Args)]
pub struct ParamsArgs {
    /// Only show parameters in this group (osc1, osc2, amp_env, filter, lfo, ...)
    #[arg(long)]
    group: Option<String>,
}

pub fn run(args: ParamsArgs) -> anyhow::Result<()> {
    let patch = ChannelParameters::default();

    let indices: Vec<usize> = (0..patch.param_count())
        .filter(|&i| {
            patch.param_info(i).is_some_and(|d| {
                args.group
                    .as_deref()
                    .is_none_or(|g| d.group.eq_ignore_ascii_case(g))
            })
        })
        .collect();

    if indices.is_empty() {
        anyhow::bail!(
            "No parameters in group '{}'",
            args.group.unwrap_or_default()
        );
    }

    println!("Patch Parameters");
    println!("================");
    println!();
    println!(
        "  {:>3}  {:20}  {:10}  {:>10}  {}",
        "#", "Name", "Group", "Default", "Range"
    );
    println!(
        "  {:>3}  {:20}  {:10}  {:>10}  {}",
        "-", "----", "-----", "-------", "-----"
    );

    for i in indices {
        let Some(desc) = patch.param_info(i) else {
            continue;
        };
        let suffix = desc.unit.suffix();
        let range = format!("{} .. {}{}", desc.min, desc.max, suffix);
        println!(
            "  {:>3}  {:20}  {:10}  {:>10}  {}",
            i,
            desc.string_id,
            desc.group,
            format!("{}{}", patch.get_param(i), suffix),
            range
        );
    }

    println!();
    println!("Set values with 'consumer play --param <name>=<value>'.");

    Ok(())
}
