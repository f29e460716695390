//! Module for parsing and representing FAP scenarios.
//!
//! This module handles the COST259-style `.scen` files: a general block with
//! the spectrum and co-site separation, a cells block, and a cell-relations
//! block carrying the interference penalties. It also derives the per-cell
//! frequency domains and the co-site neighbourhood used by the search.

use crate::error::{FapError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::path::Path;
use std::str::FromStr;

/// Cell identifier as written in the scenario file
pub type CellId = u32;
/// Position of a cell inside a [`Problem`] (cells are stored sorted by id)
pub type CellIndex = usize;
/// Channel number
pub type Frequency = i32;

/// A cell (sector) of the network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Unique identifier
    pub id: CellId,
    /// Site name, shared by co-located cells
    pub site: String,
    /// Number of transceivers needing a frequency
    pub demand: usize,
    /// Locally blocked channels
    pub blocked: BTreeSet<Frequency>,
}

impl Cell {
    pub fn new(id: CellId, site: impl Into<String>, demand: usize) -> Self {
        Cell {
            id,
            site: site.into(),
            demand,
            blocked: BTreeSet::new(),
        }
    }

    /// Add locally blocked channels
    pub fn with_blocked<I: IntoIterator<Item = Frequency>>(mut self, channels: I) -> Self {
        self.blocked.extend(channels);
        self
    }
}

/// Interference penalties between an ordered pair of cells
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterferenceWeight {
    pub from: CellId,
    pub to: CellId,
    /// Penalty per pair of transceivers sharing a frequency
    pub co_channel: f64,
    /// Penalty per pair of transceivers one channel apart
    pub adjacent_channel: f64,
}

impl InterferenceWeight {
    pub fn new(from: CellId, to: CellId, co_channel: f64, adjacent_channel: f64) -> Self {
        InterferenceWeight {
            from,
            to,
            co_channel,
            adjacent_channel,
        }
    }
}

/// Interference weight whose endpoints are resolved to cell indices
#[derive(Debug, Clone, Copy)]
pub(crate) struct ResolvedWeight {
    pub from: CellIndex,
    pub to: CellIndex,
    pub co_channel: f64,
    pub adjacent_channel: f64,
}

/// A complete FAP instance. Read-only once built.
#[derive(Debug, Clone)]
pub struct Problem {
    /// Name of the instance
    pub name: String,
    /// Lowest usable channel
    pub fmin: Frequency,
    /// Highest usable channel
    pub fmax: Frequency,
    /// Channels forbidden network-wide
    pub globally_blocked: BTreeSet<Frequency>,
    /// Minimum distance between any two frequencies at the same site
    pub co_site_separation: Frequency,
    cells: Vec<Cell>,
    weights: Vec<InterferenceWeight>,
    resolved: Vec<ResolvedWeight>,
    domains: Vec<Vec<Frequency>>,
    co_sited: Vec<Vec<CellIndex>>,
    index: HashMap<CellId, CellIndex>,
}

impl Problem {
    /// Build a problem and derive its domains.
    ///
    /// Cells are reordered by id. Weights naming an unknown cell are kept in
    /// [`Problem::weights`] but skipped by the evaluation.
    pub fn new(
        name: impl Into<String>,
        spectrum: (Frequency, Frequency),
        globally_blocked: impl IntoIterator<Item = Frequency>,
        co_site_separation: Frequency,
        mut cells: Vec<Cell>,
        mut weights: Vec<InterferenceWeight>,
    ) -> Result<Self> {
        let (fmin, fmax) = spectrum;
        if fmin > fmax {
            return Err(FapError::InvalidProblem(format!(
                "empty spectrum [{}, {}]",
                fmin, fmax
            )));
        }
        if co_site_separation < 0 {
            return Err(FapError::InvalidProblem(format!(
                "negative co-site separation {}",
                co_site_separation
            )));
        }

        cells.sort_by_key(|c| c.id);
        let mut index = HashMap::with_capacity(cells.len());
        for (i, cell) in cells.iter().enumerate() {
            if index.insert(cell.id, i).is_some() {
                return Err(FapError::InvalidProblem(format!(
                    "duplicate cell id {}",
                    cell.id
                )));
            }
        }

        weights.sort_by_key(|w| (w.from, w.to));
        let mut resolved = Vec::with_capacity(weights.len());
        for w in &weights {
            let valid = |p: f64| p.is_finite() && p >= 0.0;
            if !valid(w.co_channel) || !valid(w.adjacent_channel) {
                return Err(FapError::InvalidProblem(format!(
                    "relation {} -> {} has a negative or non-finite penalty",
                    w.from, w.to
                )));
            }
            match (index.get(&w.from), index.get(&w.to)) {
                (Some(&from), Some(&to)) => resolved.push(ResolvedWeight {
                    from,
                    to,
                    co_channel: w.co_channel,
                    adjacent_channel: w.adjacent_channel,
                }),
                _ => log::warn!(
                    "Skipping relation {} -> {}: unknown cell",
                    w.from,
                    w.to
                ),
            }
        }

        let globally_blocked: BTreeSet<Frequency> = globally_blocked.into_iter().collect();
        let domains = cells
            .iter()
            .map(|cell| {
                (fmin..=fmax)
                    .filter(|f| !globally_blocked.contains(f) && !cell.blocked.contains(f))
                    .collect()
            })
            .collect();

        let co_sited = {
            let mut by_site: HashMap<&str, Vec<CellIndex>> = HashMap::new();
            for (i, cell) in cells.iter().enumerate() {
                by_site.entry(cell.site.as_str()).or_default().push(i);
            }
            cells
                .iter()
                .enumerate()
                .map(|(i, cell)| {
                    by_site[cell.site.as_str()]
                        .iter()
                        .copied()
                        .filter(|&j| j != i)
                        .collect()
                })
                .collect()
        };

        Ok(Problem {
            name: name.into(),
            fmin,
            fmax,
            globally_blocked,
            co_site_separation,
            cells,
            weights,
            resolved,
            domains,
            co_sited,
            index,
        })
    }

    /// Parse a scenario from a `.scen` file. The instance is named after the file stem.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::parse_str(name, &text)
    }

    /// Parse a scenario from its textual content
    pub fn parse_str(name: impl Into<String>, text: &str) -> Result<Self> {
        let mut parser = ScenarioParser::default();
        let mut last_line = 0;
        for (i, line) in text.lines().enumerate() {
            last_line = i + 1;
            parser.feed(last_line, line)?;
        }
        parser.finish(name.into(), last_line)
    }

    /// All cells, sorted by id
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    pub fn cell(&self, cell: CellIndex) -> &Cell {
        &self.cells[cell]
    }

    #[inline]
    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    /// Position of the cell with the given id
    pub fn cell_index(&self, id: CellId) -> Option<CellIndex> {
        self.index.get(&id).copied()
    }

    /// Legal frequencies of a cell, ascending
    #[inline]
    pub fn domain(&self, cell: CellIndex) -> &[Frequency] {
        &self.domains[cell]
    }

    /// Other cells sharing the site of `cell`
    #[inline]
    pub fn co_sited(&self, cell: CellIndex) -> &[CellIndex] {
        &self.co_sited[cell]
    }

    /// Interference weights as given, sorted by `(from, to)`
    pub fn weights(&self) -> &[InterferenceWeight] {
        &self.weights
    }

    pub(crate) fn resolved_weights(&self) -> &[ResolvedWeight] {
        &self.resolved
    }

    /// Total number of transceivers
    pub fn total_demand(&self) -> usize {
        self.cells.iter().map(|c| c.demand).sum()
    }

    /// Fail on the first cell whose domain cannot hold its demand
    pub fn check_domains(&self) -> Result<()> {
        for (cell, domain) in self.cells.iter().zip(&self.domains) {
            if domain.len() < cell.demand {
                return Err(FapError::InsufficientDomain {
                    cell: cell.id,
                    domain: domain.len(),
                    demand: cell.demand,
                });
            }
        }
        Ok(())
    }

    /// Get statistics about the instance
    pub fn statistics(&self) -> ProblemStatistics {
        let sites: HashSet<&str> = self.cells.iter().map(|c| c.site.as_str()).collect();
        let usable_channels = (self.fmin..=self.fmax)
            .filter(|f| !self.globally_blocked.contains(f))
            .count();
        let tightest_cell = self
            .cells
            .iter()
            .zip(&self.domains)
            .filter(|(c, _)| c.demand > 0)
            .min_by_key(|(c, d)| (d.len().saturating_sub(c.demand), c.id))
            .map(|(c, _)| c.id);

        ProblemStatistics {
            name: self.name.clone(),
            num_cells: self.cells.len(),
            num_sites: sites.len(),
            total_demand: self.total_demand(),
            max_demand: self.cells.iter().map(|c| c.demand).max().unwrap_or(0),
            num_relations: self.resolved.len(),
            skipped_relations: self.weights.len() - self.resolved.len(),
            fmin: self.fmin,
            fmax: self.fmax,
            usable_channels,
            co_site_separation: self.co_site_separation,
            min_domain: self.domains.iter().map(Vec::len).min().unwrap_or(0),
            tightest_cell,
        }
    }
}

/// Statistics about a FAP instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemStatistics {
    pub name: String,
    pub num_cells: usize,
    pub num_sites: usize,
    pub total_demand: usize,
    pub max_demand: usize,
    pub num_relations: usize,
    pub skipped_relations: usize,
    pub fmin: Frequency,
    pub fmax: Frequency,
    pub usable_channels: usize,
    pub co_site_separation: Frequency,
    pub min_domain: usize,
    /// Cell with the least slack between domain size and demand
    pub tightest_cell: Option<CellId>,
}

impl std::fmt::Display for ProblemStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Instance: {}", self.name)?;
        writeln!(f, "  Cells: {} on {} sites", self.num_cells, self.num_sites)?;
        writeln!(f, "  TRXs: {} (max per cell: {})", self.total_demand, self.max_demand)?;
        writeln!(f, "  DA relations: {}", self.num_relations)?;
        if self.skipped_relations > 0 {
            writeln!(f, "  Skipped relations: {}", self.skipped_relations)?;
        }
        writeln!(f, "  Spectrum: [{}, {}]", self.fmin, self.fmax)?;
        writeln!(f, "  Usable channels: {}", self.usable_channels)?;
        writeln!(f, "  Co-site separation: {}", self.co_site_separation)?;
        write!(f, "  Smallest domain: {}", self.min_domain)?;
        if let Some(cell) = self.tightest_cell {
            write!(f, "\n  Tightest cell: {}", cell)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Preamble,
    General,
    Cells,
    Relations,
}

impl Section {
    fn from_header(token: &str) -> Option<Section> {
        match token {
            "GENERAL_INFORMATION" => Some(Section::General),
            "CELLS" => Some(Section::Cells),
            "CELL_RELATIONS" => Some(Section::Relations),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct CellBuilder {
    id: CellId,
    opened_at: usize,
    fields: Vec<String>,
    blocked: BTreeSet<Frequency>,
}

impl CellBuilder {
    fn build(self, line: usize) -> Result<Cell> {
        // Either `site demand` or the full `site <ignored> demand` layout
        let demand_field = match self.fields.len() {
            0 => return Err(FapError::parse(line, format!("cell {} has no site", self.id))),
            1 => return Err(FapError::parse(line, format!("cell {} has no demand", self.id))),
            2 => &self.fields[1],
            _ => &self.fields[2],
        };
        let demand = parse_number(line, demand_field)?;
        Ok(Cell::new(self.id, self.fields[0].clone(), demand).with_blocked(self.blocked))
    }
}

#[derive(Debug)]
enum Block {
    Closed,
    Cell(CellBuilder),
    Relation {
        from: CellId,
        to: CellId,
        opened_at: usize,
        penalties: Option<(f64, f64)>,
    },
}

/// Line-driven state machine over the scenario sections
#[derive(Debug)]
struct ScenarioParser {
    section: Section,
    block: Block,
    spectrum: Option<(Frequency, Frequency)>,
    co_site_separation: Frequency,
    globally_blocked: BTreeSet<Frequency>,
    cells: Vec<Cell>,
    relations: BTreeMap<(CellId, CellId), InterferenceWeight>,
}

impl Default for ScenarioParser {
    fn default() -> Self {
        ScenarioParser {
            section: Section::Preamble,
            block: Block::Closed,
            spectrum: None,
            co_site_separation: 0,
            globally_blocked: BTreeSet::new(),
            cells: Vec::new(),
            relations: BTreeMap::new(),
        }
    }
}

impl ScenarioParser {
    fn feed(&mut self, line_no: usize, raw: &str) -> Result<()> {
        let content = raw.split('#').next().unwrap_or("");
        let tokens = tokenize(content);
        if tokens.is_empty() {
            return Ok(());
        }

        if let Some(section) = Section::from_header(tokens[0]) {
            if !matches!(self.block, Block::Closed) {
                return Err(FapError::parse(line_no, "section header inside an open block"));
            }
            self.section = section;
            return Ok(());
        }

        if matches!(self.block, Block::Closed) && tokens == ["}"] {
            self.section = Section::Preamble;
            return Ok(());
        }

        match self.section {
            Section::Preamble => {
                log::warn!("Line {}: ignoring content outside any section", line_no);
                Ok(())
            }
            Section::General => self.general_line(line_no, content, &tokens),
            Section::Cells => self.cell_line(line_no, &tokens),
            Section::Relations => self.relation_line(line_no, &tokens),
        }
    }

    fn general_line(&mut self, line_no: usize, content: &str, tokens: &[&str]) -> Result<()> {
        match tokens[0] {
            "SPECTRUM" => {
                let bounds = extract_integers(line_no, content)?;
                match bounds.as_slice() {
                    [fmin, fmax] => self.spectrum = Some((*fmin, *fmax)),
                    _ => {
                        return Err(FapError::parse(
                            line_no,
                            "SPECTRUM expects exactly two bounds",
                        ))
                    }
                }
            }
            "CO_SITE_SEPARATION" => {
                let value = tokens
                    .get(1)
                    .ok_or_else(|| FapError::parse(line_no, "missing co-site separation"))?;
                self.co_site_separation = parse_number(line_no, value)?;
            }
            "GLOBALLY_BLOCKED_CHANNELS" => {
                for token in &tokens[1..] {
                    self.globally_blocked.insert(parse_number(line_no, token)?);
                }
            }
            other => log::warn!("Line {}: unknown general key '{}'", line_no, other),
        }
        Ok(())
    }

    fn cell_line(&mut self, line_no: usize, tokens: &[&str]) -> Result<()> {
        let body = if matches!(self.block, Block::Closed) {
            match tokens {
                [id, "{", rest @ ..] => {
                    self.block = Block::Cell(CellBuilder {
                        id: parse_number(line_no, id)?,
                        opened_at: line_no,
                        fields: Vec::new(),
                        blocked: BTreeSet::new(),
                    });
                    rest
                }
                _ => return Err(FapError::parse(line_no, "expected '<cell id> {'")),
            }
        } else {
            tokens
        };

        let Block::Cell(builder) = &mut self.block else {
            return Err(FapError::parse(line_no, "cell data outside a cell block"));
        };

        let mut closed = false;
        let mut iter = body.iter().copied();
        while let Some(token) = iter.next() {
            match token {
                "}" => closed = true,
                "LBC" => {
                    for channel in iter.by_ref() {
                        if channel == "}" {
                            closed = true;
                            break;
                        }
                        builder.blocked.insert(parse_number(line_no, channel)?);
                    }
                }
                "LOC" => closed = iter.by_ref().any(|t| t == "}"),
                field => builder.fields.push(field.to_string()),
            }
            if closed {
                break;
            }
        }

        if closed {
            if let Block::Cell(builder) = std::mem::replace(&mut self.block, Block::Closed) {
                self.cells.push(builder.build(line_no)?);
            }
        }
        Ok(())
    }

    fn relation_line(&mut self, line_no: usize, tokens: &[&str]) -> Result<()> {
        let body = if matches!(self.block, Block::Closed) {
            match tokens {
                [from, to, "{", rest @ ..] => {
                    self.block = Block::Relation {
                        from: parse_number(line_no, from)?,
                        to: parse_number(line_no, to)?,
                        opened_at: line_no,
                        penalties: None,
                    };
                    rest
                }
                _ => return Err(FapError::parse(line_no, "expected '<cell> <cell> {'")),
            }
        } else {
            tokens
        };

        let Block::Relation { penalties, .. } = &mut self.block else {
            return Err(FapError::parse(line_no, "relation data outside a relation block"));
        };

        let mut closed = false;
        let mut iter = body.iter().copied().peekable();
        while let Some(token) = iter.next() {
            match token {
                "}" => {
                    closed = true;
                    break;
                }
                "DA" => {
                    let co = iter
                        .next()
                        .filter(|t| *t != "}")
                        .ok_or_else(|| FapError::parse(line_no, "DA without co-channel penalty"))?;
                    let co: f64 = parse_number(line_no, co)?;
                    let adjacent = match iter.peek() {
                        Some(t) if t.parse::<f64>().is_ok() => {
                            parse_number(line_no, iter.next().unwrap_or("0"))?
                        }
                        _ => 0.0,
                    };
                    *penalties = Some((co, adjacent));
                }
                _ => {}
            }
        }

        if closed {
            if let Block::Relation {
                from,
                to,
                penalties,
                ..
            } = std::mem::replace(&mut self.block, Block::Closed)
            {
                match penalties {
                    Some((co, adjacent)) => {
                        self.relations
                            .insert((from, to), InterferenceWeight::new(from, to, co, adjacent));
                    }
                    None => log::debug!("Relation {} -> {} has no DA entry", from, to),
                }
            }
        }
        Ok(())
    }

    fn finish(self, name: String, last_line: usize) -> Result<Problem> {
        match self.block {
            Block::Closed => {}
            Block::Cell(builder) => {
                return Err(FapError::parse(
                    builder.opened_at,
                    format!("unterminated block for cell {}", builder.id),
                ))
            }
            Block::Relation {
                from, to, opened_at, ..
            } => {
                return Err(FapError::parse(
                    opened_at,
                    format!("unterminated block for relation {} -> {}", from, to),
                ))
            }
        }
        let spectrum = self
            .spectrum
            .ok_or_else(|| FapError::parse(last_line, "missing SPECTRUM"))?;

        Problem::new(
            name,
            spectrum,
            self.globally_blocked,
            self.co_site_separation,
            self.cells,
            self.relations.into_values().collect(),
        )
    }
}

/// Split a line into tokens; `;` is a terminator, braces are always their own token
fn tokenize(content: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    for word in content.split(|c: char| c.is_whitespace() || c == ';') {
        let mut rest = word;
        while let Some(pos) = rest.find(|c: char| c == '{' || c == '}') {
            if pos > 0 {
                tokens.push(&rest[..pos]);
            }
            tokens.push(&rest[pos..pos + 1]);
            rest = &rest[pos + 1..];
        }
        if !rest.is_empty() {
            tokens.push(rest);
        }
    }
    tokens
}

/// Signed integers embedded in `content`; a stray `-` is a parse error
fn extract_integers(line_no: usize, content: &str) -> Result<Vec<Frequency>> {
    content
        .split(|c: char| !c.is_ascii_digit() && c != '-')
        .filter(|s| !s.is_empty())
        .map(|s| parse_number(line_no, s))
        .collect()
}

fn parse_number<T: FromStr>(line_no: usize, token: &str) -> Result<T> {
    token
        .parse()
        .map_err(|_| FapError::parse(line_no, format!("invalid number '{}'", token)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TINY: &str = "\
# tiny scenario
GENERAL_INFORMATION {
  SPECTRUM [1;10]
  CO_SITE_SEPARATION 2;
  GLOBALLY_BLOCKED_CHANNELS 5;
}

CELLS {
  2 {
    SITE_A 0 2;
    LBC 1 2;
  }
  1 {
    SITE_A 0 1;   # sector on the same mast
  }
  3 {
    SITE_B 1 0;
    LOC 12.5 40.1;
  }
}

CELL_RELATIONS {
  1 2 {
    DA 10.0 5.0;
  }
  2 3 {
    DA 3;
  }
  1 9 {
    DA 1 1;
  }
  3 1 {
    CA 4;
  }
}
";

    const NO_CHANNELS: [Frequency; 0] = [];

    fn tiny() -> Problem {
        Problem::parse_str("tiny", TINY).unwrap()
    }

    #[test]
    fn test_parse_general_information() {
        let problem = tiny();
        assert_eq!((problem.fmin, problem.fmax), (1, 10));
        assert_eq!(problem.co_site_separation, 2);
        assert!(problem.globally_blocked.contains(&5));
    }

    #[test]
    fn test_parse_cells_sorted_by_id() {
        let problem = tiny();
        let ids: Vec<CellId> = problem.cells().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        let cell2 = problem.cell(problem.cell_index(2).unwrap());
        assert_eq!(cell2.site, "SITE_A");
        assert_eq!(cell2.demand, 2);
        assert_eq!(cell2.blocked, BTreeSet::from([1, 2]));

        // zero demand is allowed
        assert_eq!(problem.cell(2).demand, 0);
    }

    #[test]
    fn test_domains_exclude_blocked_channels() {
        let problem = tiny();
        assert_eq!(problem.domain(0), &[1, 2, 3, 4, 6, 7, 8, 9, 10]);
        assert_eq!(problem.domain(1), &[3, 4, 6, 7, 8, 9, 10]);
    }

    #[test]
    fn test_relations_with_unknown_cells_are_skipped() {
        let problem = tiny();
        // 1->9 names an unknown cell, 3->1 has no DA entry
        assert_eq!(problem.weights().len(), 3);
        assert_eq!(problem.resolved_weights().len(), 2);

        let w = problem.weights()[0];
        assert_eq!((w.from, w.to), (1, 2));
        assert_eq!(w.co_channel, 10.0);
        assert_eq!(w.adjacent_channel, 5.0);

        let w = problem.weights().iter().find(|w| w.from == 2).unwrap();
        assert_eq!(w.adjacent_channel, 0.0);
    }

    #[test]
    fn test_co_sited_cells() {
        let problem = tiny();
        assert_eq!(problem.co_sited(0), &[1]);
        assert_eq!(problem.co_sited(1), &[0]);
        assert!(problem.co_sited(2).is_empty());
    }

    #[test]
    fn test_single_line_blocks() {
        let text = "GENERAL_INFORMATION {\nSPECTRUM [0;3]\n}\n\
                    CELLS {\n7 { S 2 LBC 0 }\n}\n\
                    CELL_RELATIONS {\n7 7 { DA 1 0.5 }\n}\n";
        let problem = Problem::parse_str("inline", text).unwrap();
        assert_eq!(problem.cell(0).demand, 2);
        assert_eq!(problem.domain(0), &[1, 2, 3]);
        assert_eq!(problem.weights()[0].adjacent_channel, 0.5);
    }

    #[test]
    fn test_missing_spectrum() {
        let err = Problem::parse_str("x", "CELLS {\n1 { A 0 1 }\n}\n").unwrap_err();
        assert!(matches!(err, FapError::Parse { .. }));
    }

    #[test]
    fn test_signed_spectrum() {
        let text = "GENERAL_INFORMATION {\nSPECTRUM [-5;10]\n}\nCELLS {\n1 { A 1 }\n}\n";
        let problem = Problem::parse_str("x", text).unwrap();
        assert_eq!((problem.fmin, problem.fmax), (-5, 10));
        assert_eq!(problem.domain(0).first(), Some(&-5));

        let text = "GENERAL_INFORMATION {\nSPECTRUM [5-;10]\n}\n";
        match Problem::parse_str("x", text) {
            Err(FapError::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_number_reports_line() {
        let text = "GENERAL_INFORMATION {\nSPECTRUM [1;5]\nCO_SITE_SEPARATION two\n}\n";
        match Problem::parse_str("x", text) {
            Err(FapError::Parse { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_unterminated_cell_block() {
        let text = "GENERAL_INFORMATION {\nSPECTRUM [1;5]\n}\nCELLS {\n4 {\nA 0 1\n";
        match Problem::parse_str("x", text) {
            Err(FapError::Parse { line, .. }) => assert_eq!(line, 5),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_problems() {
        let cells = vec![Cell::new(1, "A", 1), Cell::new(1, "B", 1)];
        assert!(matches!(
            Problem::new("dup", (1, 5), NO_CHANNELS, 1, cells, vec![]),
            Err(FapError::InvalidProblem(_))
        ));
        assert!(matches!(
            Problem::new("empty", (5, 1), NO_CHANNELS, 1, vec![], vec![]),
            Err(FapError::InvalidProblem(_))
        ));
        let negative = vec![InterferenceWeight::new(1, 2, -1.0, 0.0)];
        assert!(matches!(
            Problem::new("neg", (1, 5), NO_CHANNELS, 1, vec![Cell::new(1, "A", 1)], negative),
            Err(FapError::InvalidProblem(_))
        ));
    }

    #[test]
    fn test_check_domains() {
        let cells = vec![Cell::new(1, "A", 2), Cell::new(2, "B", 3).with_blocked([2])];
        let problem = Problem::new("small", (1, 3), NO_CHANNELS, 1, cells, vec![]).unwrap();
        match problem.check_domains() {
            Err(FapError::InsufficientDomain { cell, domain, demand }) => {
                assert_eq!((cell, domain, demand), (2, 2, 3));
            }
            other => panic!("expected insufficient domain, got {:?}", other),
        }
    }

    #[test]
    fn test_statistics() {
        let stats = tiny().statistics();
        assert_eq!(stats.num_cells, 3);
        assert_eq!(stats.num_sites, 2);
        assert_eq!(stats.total_demand, 3);
        assert_eq!(stats.num_relations, 2);
        assert_eq!(stats.skipped_relations, 1);
        assert_eq!(stats.usable_channels, 9);
        assert_eq!(stats.tightest_cell, Some(2));
        assert!(stats.to_string().contains("Cells: 3 on 2 sites"));
    }
}
