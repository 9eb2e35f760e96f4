use super::{
    grid::{Element, Node, Point},
    GlobalData, Grid,
};
use crate::fem_problem::HeatError;
use std::{fmt, fs, path::Path};

/*
    Mesh File Format:

        SimulationTime 500          <- 10 header lines; the value is the last token
        ...
        Elements number 9
        *Node
              1,  0.0, 0.0          <- id, x, y
        ...
        *Element, type=DC2D4
         1,  1,  5,  6,  2          <- id, 4 node ids (counter-clockwise)
        ...
        *BC
        1, 2, 3, 4, 5, 8, ...       <- ids of boundary Nodes (may span several lines)

    Tokens are separated by whitespace and/or commas; blank lines are ignored.
*/

#[derive(Clone, Copy, PartialEq)]
enum Section {
    Header,
    Nodes,
    Elements,
    BoundaryConditions,
}

/// Read and parse a mesh file
pub fn read_mesh_file(path: impl AsRef<Path>) -> Result<(Grid, GlobalData), HeatError> {
    let contents = fs::read_to_string(path.as_ref())
        .map_err(|e| MalformedInputError::Unreadable(path.as_ref().display().to_string(), e))?;
    parse_mesh(&contents)
}

/// Parse the contents of a mesh file into a [Grid] and its [GlobalData]
///
/// ```
/// use fem_heat_2d::domain::mesh_file::parse_mesh;
///
/// let (grid, data) = parse_mesh("
///     SimulationTime 10
///     SimulationStepTime 5
///     Conductivity 25
///     Alfa 300
///     Tot 1200
///     InitialTemp 100
///     Density 7800
///     SpecificHeat 700
///     Nodes number 4
///     Elements number 1
///     *Node
///     1, 0.0, 0.0
///     2, 1.0, 0.0
///     3, 1.0, 1.0
///     4, 0.0, 1.0
///     *Element, type=DC2D4
///     1, 1, 2, 3, 4
///     *BC
///     1, 2
/// ").unwrap();
///
/// assert_eq!(grid.num_elements(), 1);
/// assert_eq!(data.num_time_steps().unwrap(), 2);
/// assert!(grid.nodes[1].boundary && !grid.nodes[2].boundary);
/// ```
///
/// # Returns
/// * An `Err` if the text doesn't follow the mesh file format
/// * An `Err` if the header counts don't match the mesh, or the time settings are invalid
/// * The Grid (unassembled) and GlobalData, otherwise
pub fn parse_mesh(contents: &str) -> Result<(Grid, GlobalData), HeatError> {
    let mut section = Section::Header;
    let mut seen_nodes = false;
    let mut seen_elements = false;

    let mut header: Vec<f64> = Vec::with_capacity(GlobalData::NUM_FIELDS);
    let mut nodes: Vec<Node> = Vec::new();
    let mut elements: Vec<Element> = Vec::new();

    for (idx, raw_line) in contents.lines().enumerate() {
        let line_number = idx + 1;
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with('*') {
            section = section_marker(line, line_number)?;
            match section {
                Section::Nodes => seen_nodes = true,
                Section::Elements => seen_elements = true,
                _ => (),
            }
            if header.len() != GlobalData::NUM_FIELDS {
                return Err(MalformedInputError::HeaderLength(header.len()).into());
            }
            continue;
        }

        let tokens = tokenize(line);

        match section {
            Section::Header => {
                let last = tokens.last().copied().unwrap_or_default();
                header.push(parse_token(last, line_number)?);
            }
            Section::Nodes => {
                let [id, x, y] = fixed_tokens::<3>(&tokens, line_number)?;
                let id = parse_id(id, nodes.len() + 1, line_number)?;
                nodes.push(Node::new(
                    id,
                    Point::new(parse_token(x, line_number)?, parse_token(y, line_number)?),
                    false,
                ));
            }
            Section::Elements => {
                let [id, n1, n2, n3, n4] = fixed_tokens::<5>(&tokens, line_number)?;
                let id = parse_id(id, elements.len() + 1, line_number)?;
                let mut node_ids = [0; 4];
                for (slot, token) in node_ids.iter_mut().zip([n1, n2, n3, n4]) {
                    *slot = parse_token(token, line_number)?;
                }
                elements.push(Element::new(id, node_ids));
            }
            Section::BoundaryConditions => {
                for token in tokens {
                    let id: usize = parse_token(token, line_number)?;
                    match id.checked_sub(1).and_then(|i| nodes.get_mut(i)) {
                        Some(node) => node.boundary = true,
                        None => {
                            return Err(MalformedInputError::UnknownBoundaryNode {
                                line: line_number,
                                node: id,
                            }
                            .into())
                        }
                    }
                }
            }
        }
    }

    if !seen_nodes {
        return Err(MalformedInputError::MissingSection("*Node").into());
    }
    if !seen_elements {
        return Err(MalformedInputError::MissingSection("*Element").into());
    }

    let mut values = [0.0; GlobalData::NUM_FIELDS];
    values.copy_from_slice(&header);
    let data = GlobalData::from_values(values)?;

    let grid = Grid::new(nodes, elements)?;
    data.validate(grid.num_nodes(), grid.num_elements())?;

    Ok((grid, data))
}

fn section_marker(line: &str, line_number: usize) -> Result<Section, MalformedInputError> {
    let name = tokenize(line).first().copied().unwrap_or(line);
    match name {
        "*Node" => Ok(Section::Nodes),
        "*Element" => Ok(Section::Elements),
        "*BC" => Ok(Section::BoundaryConditions),
        _ => Err(MalformedInputError::UnknownSection {
            line: line_number,
            name: name.to_string(),
        }),
    }
}

fn tokenize(line: &str) -> Vec<&str> {
    line.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .collect()
}

fn fixed_tokens<'a, const N: usize>(
    tokens: &[&'a str],
    line_number: usize,
) -> Result<[&'a str; N], MalformedInputError> {
    <[&str; N]>::try_from(tokens).map_err(|_| MalformedInputError::WrongTokenCount {
        line: line_number,
        expected: N,
        found: tokens.len(),
    })
}

fn parse_token<T: std::str::FromStr>(token: &str, line_number: usize) -> Result<T, MalformedInputError> {
    token.parse().map_err(|_| MalformedInputError::UnparsableToken {
        line: line_number,
        token: token.to_string(),
    })
}

// ids must be listed in order, starting from 1
fn parse_id(token: &str, expected: usize, line_number: usize) -> Result<usize, MalformedInputError> {
    let found: usize = parse_token(token, line_number)?;
    if found == expected {
        Ok(found)
    } else {
        Err(MalformedInputError::NonConsecutiveId {
            line: line_number,
            expected,
            found,
        })
    }
}

/// Error Type for mesh text which can't be read or doesn't follow the mesh file format
#[derive(Debug)]
pub enum MalformedInputError {
    Unreadable(String, std::io::Error),
    MissingSection(&'static str),
    HeaderLength(usize),
    UnknownSection { line: usize, name: String },
    UnparsableToken { line: usize, token: String },
    WrongTokenCount { line: usize, expected: usize, found: usize },
    NonConsecutiveId { line: usize, expected: usize, found: usize },
    UnknownBoundaryNode { line: usize, node: usize },
}

impl MalformedInputError {
    /// 1-based line number of the offending line, if there is one
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::UnknownSection { line, .. }
            | Self::UnparsableToken { line, .. }
            | Self::WrongTokenCount { line, .. }
            | Self::NonConsecutiveId { line, .. }
            | Self::UnknownBoundaryNode { line, .. } => Some(*line),
            _ => None,
        }
    }
}

impl std::error::Error for MalformedInputError {}

impl fmt::Display for MalformedInputError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Unreadable(path, e) => write!(f, "Unable to read mesh file '{}' ({})", path, e),
            Self::MissingSection(name) => write!(f, "Mesh is missing the '{}' section!", name),
            Self::HeaderLength(found) => write!(
                f,
                "Mesh header must contain exactly {} values (found: {})!",
                GlobalData::NUM_FIELDS,
                found
            ),
            Self::UnknownSection { line, name } => {
                write!(f, "Line {}: unknown section '{}'!", line, name)
            }
            Self::UnparsableToken { line, token } => {
                write!(f, "Line {}: unable to parse '{}'!", line, token)
            }
            Self::WrongTokenCount {
                line,
                expected,
                found,
            } => write!(
                f,
                "Line {}: expected {} values, found {}!",
                line, expected, found
            ),
            Self::NonConsecutiveId {
                line,
                expected,
                found,
            } => write!(f, "Line {}: expected id {}, found {}!", line, expected, found),
            Self::UnknownBoundaryNode { line, node } => {
                write!(f, "Line {}: boundary Node {} does not exist!", line, node)
            }
        }
    }
}
