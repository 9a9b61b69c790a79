//! Spec document generation command.

use anyhow::{Context, Result};
use cephlab::cluster::Cluster;
use cephlab::exec::SshRemote;
use cephlab::spec::{parse_spec_blocks, render_document, SpecFileGenerator};

/// Render the service blocks in `file` and push the document to the
/// installer node. With `dry_run`, print the document instead.
pub fn handle_spec(cluster: &Cluster<SshRemote>, file: &str, dry_run: bool) -> Result<()> {
    let input = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read spec file: {file}"))?;
    let specs = parse_spec_blocks(&input)?;

    if dry_run {
        let (document, bundles) = render_document(cluster, &specs)?;
        if !bundles.is_empty() {
            println!("# would install {} trust anchor(s) on apply", bundles.len());
        }
        print!("{document}");
        return Ok(());
    }

    let installer = cluster.installer()?;
    let generator = SpecFileGenerator::new(installer, cluster, specs);
    let path = generator.create_spec_file()?;

    println!("✓ Spec written to {} on {}", path, installer.shortname);
    println!("Apply it with: cephadm shell -- ceph orch apply -i {path}");
    Ok(())
}
