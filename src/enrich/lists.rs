use crate::utils::Result;
use std::{collections::HashSet, io::BufRead};

/// A named query set of gene identifiers from a FASTA-like list file.
/// `name` is `None` for a leading block with no `>` header.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneList {
    pub name: Option<String>,
    pub genes: Vec<String>,
}

impl GeneList {
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

/// Parses zero or more gene lists: each `>name` line opens a new list and
/// the following lines hold one gene id each. Lines before the first header
/// form an unnamed list; a file with no headers is one unnamed list.
pub fn read_gene_lists<R: BufRead>(reader: R) -> Result<Vec<GeneList>> {
    let mut lists = Vec::new();
    let mut current = GeneList {
        name: None,
        genes: Vec::new(),
    };
    let mut saw_header = false;

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if let Some(name) = line.strip_prefix('>') {
            if saw_header || !current.genes.is_empty() {
                lists.push(current);
            }
            current = GeneList {
                name: Some(name.trim_start_matches('>').to_string()),
                genes: Vec::new(),
            };
            saw_header = true;
        } else if !line.is_empty() {
            current.genes.push(line.to_string());
        }
    }
    lists.push(current);
    Ok(lists)
}

/// Reads a background population: every non-header, non-empty line of the
/// same FASTA-like format.
pub fn read_background<R: BufRead>(reader: R) -> Result<HashSet<String>> {
    let mut genes = HashSet::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if !line.is_empty() && !line.starts_with('>') {
            genes.insert(line.to_string());
        }
    }
    Ok(genes)
}
