use crate::cli::{GenerateArgs, InspectArgs};
use base62flake::{Base62Id, Node, NodeSettings, DEFAULT_EPOCH, DEFAULT_NODE_ID};
use std::io::Write;
use std::sync::Arc;
use tracing::{debug, info};

pub fn generate(
    args: &GenerateArgs,
    out: &mut impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let node = match args.epoch {
        Some(epoch) => {
            let settings = NodeSettings::builder()
                .node_id(args.node_id.unwrap_or(DEFAULT_NODE_ID))
                .epoch(epoch)
                .build();
            Arc::new(Node::with_settings(settings)?)
        }
        None => {
            if let Some(node_id) = args.node_id {
                base62flake::set_default_node_id(node_id)?;
            }
            base62flake::default_node()
        }
    };

    info!(
        node_id = node.node_id(),
        epoch = %node.epoch(),
        count = args.count,
        "generating ids"
    );

    for _ in 0..args.count {
        let id = node.next_id();
        let code = if args.padded {
            Base62Id::encode_padded(id)
        } else {
            Base62Id::from(id)
        };
        writeln!(out, "{code}")?;
    }

    Ok(())
}

pub fn inspect(
    args: &InspectArgs,
    out: &mut impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let epoch = args.epoch.unwrap_or(DEFAULT_EPOCH);

    for raw in &args.ids {
        let code: Base62Id = raw
            .parse()
            .map_err(|e| format!("cannot decode {raw:?}: {e}"))?;
        let flake = code.to_flake_id();
        debug!(code = %code, raw = code.to_u64(), "decoded id");

        let minted = flake
            .timestamp_in(epoch)
            .map(|t| t.to_string())
            .unwrap_or_else(|| "out of range".to_owned());
        writeln!(
            out,
            "{code}\traw={}\ttime={minted}\tnode={}\tseq={}",
            code.to_u64(),
            flake.node_id(),
            flake.sequence()
        )?;
    }

    Ok(())
}
