use anyhow::{Context, Result};

const ONTOLOGY_FILE: &str = "EquipmentProfileCoreRDFSAugmented-v2_4_15-4Jul2016.rdf";
const TRIPLES_FILE: &str = "triples.txt";

fn main() -> Result<()> {
    let rdf_data = std::fs::read_to_string(ONTOLOGY_FILE)
        .with_context(|| format!("Failed to read ontology file {}", ONTOLOGY_FILE))?;

    let output = ontology::extract_to_lines(&rdf_data)?;
    let count = output.lines().count();

    std::fs::write(TRIPLES_FILE, output)
        .with_context(|| format!("Failed to write {}", TRIPLES_FILE))?;

    println!("Wrote {} triples to {}", count, TRIPLES_FILE);
    Ok(())
}
