//! Tree command - Display the container hierarchy

use crate::api::RestDirectory;
use crate::error::CliResult;
use crate::output::render_tree;
use clap::Args;
use oxidir_engine::tree::DirectoryTreeModel;
use std::sync::Arc;

/// Arguments for the tree command
#[derive(Args)]
pub struct TreeArgs {
    /// Output as JSON (flat list of container DNs)
    #[arg(long)]
    pub json: bool,
}

/// Execute the tree command
pub async fn execute(args: TreeArgs) -> CliResult<()> {
    let client = Arc::new(RestDirectory::from_defaults().await?);

    let model = DirectoryTreeModel::new(client);
    model.refresh().await?;

    let Some(root) = model.root().await else {
        println!("The directory has no containers.");
        return Ok(());
    };

    if args.json {
        let mut dns = Vec::new();
        collect_dns(&root, &mut dns);
        println!("{}", serde_json::to_string_pretty(&dns)?);
    } else {
        print!("{}", render_tree(&root));
    }

    Ok(())
}

fn collect_dns(node: &oxidir_engine::model::TreeNode, out: &mut Vec<String>) {
    out.push(node.dn.to_string());
    for child in &node.children {
        collect_dns(child, out);
    }
}
