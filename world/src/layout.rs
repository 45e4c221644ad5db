//! Text layout loader for Tokyo grids.
//!
//! A layout is a `"<width> <height>"` line followed by `height` rows of exactly
//! `width` glyphs drawn from `.` (empty), `R` (residential), `X` (pre-destroyed),
//! `G` (threat start) and `M` (evader start).

use std::str::FromStr;

use thiserror::Error;
use tokyo_core::{CellCoord, CellKind};

const GLYPH_EMPTY: char = '.';
const GLYPH_RESIDENTIAL: char = 'R';
const GLYPH_DESTROYED: char = 'X';
const GLYPH_THREAT: char = 'G';
const GLYPH_EVADER: char = 'M';

/// Errors raised while decoding a grid layout.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    /// The dimensions line did not hold two unsigned integers.
    #[error("could not parse grid dimensions '{0}'")]
    InvalidDimensions(String),
    /// The grid has no cells along one axis.
    #[error("grid must be at least one cell wide and one cell tall")]
    EmptyGrid,
    /// Fewer rows were supplied than the dimensions declare.
    #[error("grid declares {expected} rows but only {found} were provided")]
    MissingRows {
        /// Rows declared by the dimensions line.
        expected: u32,
        /// Rows actually supplied.
        found: u32,
    },
    /// More rows were supplied than the dimensions declare.
    #[error("grid declares {expected} rows but more were provided")]
    UnexpectedRow {
        /// Rows declared by the dimensions line.
        expected: u32,
    },
    /// A row did not match the declared width.
    #[error("row {row} holds {found} cells but the grid is {expected} wide")]
    RowLength {
        /// Zero-based row index.
        row: u32,
        /// Declared width.
        expected: u32,
        /// Glyphs found on the row.
        found: usize,
    },
    /// A glyph outside the layout alphabet was found.
    #[error("unknown glyph '{glyph}' at column {column}, row {row}")]
    UnknownGlyph {
        /// Offending character.
        glyph: char,
        /// Zero-based column index.
        column: u32,
        /// Zero-based row index.
        row: u32,
    },
    /// The layout has no `G` cell.
    #[error("grid has no threat start ('G')")]
    MissingThreat,
    /// The layout has more than one `G` cell.
    #[error("grid has a second threat start at column {column}, row {row}")]
    DuplicateThreat {
        /// Zero-based column index of the second start.
        column: u32,
        /// Zero-based row index of the second start.
        row: u32,
    },
}

/// Decoded grid: static terrain plus the starting cells of every agent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    columns: u32,
    rows: u32,
    cells: Vec<CellKind>,
    threat: CellCoord,
    evaders: Vec<CellCoord>,
}

impl Layout {
    /// Parses a `"<width> <height>"` dimensions line.
    pub fn parse_dimensions(line: &str) -> Result<(u32, u32), LayoutError> {
        let invalid = || LayoutError::InvalidDimensions(line.trim().to_owned());
        let mut fields = line.split_whitespace();
        let columns = fields
            .next()
            .and_then(|field| field.parse::<u32>().ok())
            .ok_or_else(invalid)?;
        let rows = fields
            .next()
            .and_then(|field| field.parse::<u32>().ok())
            .ok_or_else(invalid)?;
        if fields.next().is_some() {
            return Err(invalid());
        }
        if columns == 0 || rows == 0 {
            return Err(LayoutError::EmptyGrid);
        }

        Ok((columns, rows))
    }

    /// Decodes `rows` lines of `columns` glyphs each.
    ///
    /// Trailing carriage returns and newlines are ignored; any other length
    /// mismatch is an error.
    pub fn parse<'a, I>(columns: u32, rows: u32, lines: I) -> Result<Self, LayoutError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        if columns == 0 || rows == 0 {
            return Err(LayoutError::EmptyGrid);
        }

        let capacity = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(0);
        let mut cells = Vec::with_capacity(capacity);
        let mut threat = None;
        let mut evaders = Vec::new();
        let mut found = 0;

        for line in lines {
            if found == rows {
                return Err(LayoutError::UnexpectedRow { expected: rows });
            }
            let row = found;
            let line = line.trim_end_matches(['\r', '\n']);
            let width = line.chars().count();
            if width != usize::try_from(columns).unwrap_or(usize::MAX) {
                return Err(LayoutError::RowLength {
                    row,
                    expected: columns,
                    found: width,
                });
            }

            for (column, glyph) in (0..columns).zip(line.chars()) {
                let coord = CellCoord::new(column, row);
                let kind = match glyph {
                    GLYPH_EMPTY => CellKind::Empty,
                    GLYPH_RESIDENTIAL => CellKind::Residential,
                    GLYPH_DESTROYED => CellKind::Destroyed,
                    GLYPH_THREAT => {
                        if threat.replace(coord).is_some() {
                            return Err(LayoutError::DuplicateThreat { column, row });
                        }
                        CellKind::Empty
                    }
                    GLYPH_EVADER => {
                        evaders.push(coord);
                        CellKind::Empty
                    }
                    glyph => return Err(LayoutError::UnknownGlyph { glyph, column, row }),
                };
                cells.push(kind);
            }

            found += 1;
        }

        if found < rows {
            return Err(LayoutError::MissingRows {
                expected: rows,
                found,
            });
        }

        Ok(Self {
            columns,
            rows,
            cells,
            threat: threat.ok_or(LayoutError::MissingThreat)?,
            evaders,
        })
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Starting cell of the threat.
    #[must_use]
    pub const fn threat(&self) -> CellCoord {
        self.threat
    }

    /// Starting cells of the evaders in row-major order.
    #[must_use]
    pub fn evaders(&self) -> &[CellCoord] {
        &self.evaders
    }

    /// Counts the buildings standing at load time.
    #[must_use]
    pub fn residential_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|kind| **kind == CellKind::Residential)
            .count()
    }

    /// Iterates over every cell's terrain in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, CellKind)> + '_ {
        let columns = self.columns;
        self.cells.iter().enumerate().map(move |(index, kind)| {
            let index = u32::try_from(index).unwrap_or(u32::MAX);
            (CellCoord::new(index % columns, index / columns), *kind)
        })
    }
}

impl FromStr for Layout {
    type Err = LayoutError;

    /// Parses a dimensions line followed by the grid rows. Blank trailing lines
    /// are ignored.
    fn from_str(source: &str) -> Result<Self, Self::Err> {
        let mut lines = source.lines();
        let header = lines
            .next()
            .ok_or_else(|| LayoutError::InvalidDimensions(String::new()))?;
        let (columns, rows) = Self::parse_dimensions(header)?;
        let body: Vec<&str> = lines.collect();
        let used = body
            .iter()
            .rposition(|line| !line.trim().is_empty())
            .map_or(0, |last| last + 1);

        Self::parse(columns, rows, body[..used].iter().copied())
    }
}
