//! Loading an alignment [`Graph`] from a textual dump.
//!
//! The dump is a line-oriented, whitespace-delimited format in which every
//! line declares one entity. Entities must be declared before they are
//! referenced. Blank lines and lines starting with `#` are ignored.
//!
//! ```text
//! scope <name>
//! sequence <name> <genome> <start> <length> [<header ...>]
//! group <name> <scope> [<nested-scope>]
//! end <name> <group|->
//! link <group> <5'-end> <3'-end>
//! block <name> <scope> <length> <5'-end> <3'-end>
//! segment <block> <sequence|-> <+|-> <start>
//! chain <name> <scope> <block> [<block> ...]
//! ```

use std::io;
use std::io::BufRead;
use std::iter;

use crate::graph::Builder;
use crate::graph::Graph;
use crate::graph::builder;

pub mod line;

pub use line::Line;

/// The new line character.
const NEW_LINE: char = '\n';

/// The carriage return character.
const CARRIAGE_RETURN: char = '\r';

/// An error related to a [`Reader`].
#[derive(Debug)]
pub enum Error {
    /// An I/O error.
    Io(io::Error),

    /// A line could not be parsed.
    Line(usize, line::ParseError),

    /// A line could not be applied to the graph.
    Graph(usize, builder::Error),

    /// The graph could not be finalized.
    Build(builder::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(err) => write!(f, "i/o error: {err}"),
            Error::Line(number, err) => write!(f, "line error at line {number}: {err}"),
            Error::Graph(number, err) => write!(f, "graph error at line {number}: {err}"),
            Error::Build(err) => write!(f, "graph error: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A graph dump reader.
#[derive(Clone, Debug)]
pub struct Reader<T>
where
    T: BufRead,
{
    /// The inner reader.
    inner: T,

    /// The number of lines read so far.
    line_number: usize,
}

impl<T> Reader<T>
where
    T: BufRead,
{
    /// Creates a graph dump reader.
    ///
    /// # Examples
    ///
    /// ```
    /// let data = b"scope 0\n";
    /// let reader = cactus_export::store::Reader::new(&data[..]);
    /// ```
    pub fn new(inner: T) -> Self {
        Self::from(inner)
    }

    /// Gets the number of lines read so far.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Consumes self and returns the inner reader.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Attempts to read a [`Line`] from the underlying reader.
    ///
    /// # Examples
    ///
    /// ```
    /// use cactus_export::store::Line;
    /// use cactus_export::store::Reader;
    ///
    /// let data = b"# a comment\nscope 0\n";
    /// let mut reader = Reader::new(&data[..]);
    ///
    /// let mut buffer = String::new();
    /// assert_eq!(reader.read_line(&mut buffer)?, Some(Line::Empty));
    /// assert!(matches!(
    ///     reader.read_line(&mut buffer)?,
    ///     Some(Line::Scope { .. })
    /// ));
    /// assert_eq!(reader.read_line(&mut buffer)?, None);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn read_line(&mut self, buffer: &mut String) -> Result<Option<Line>, Error> {
        let read = read_line(&mut self.inner, buffer).map_err(Error::Io)?;

        match read {
            0 => Ok(None),
            _ => {
                self.line_number += 1;

                let line = buffer
                    .parse::<Line>()
                    .map_err(|err| Error::Line(self.line_number, err))?;

                Ok(Some(line))
            }
        }
    }

    /// Returns an iterator over the [`Line`]s in the underlying reader.
    ///
    /// # Examples
    ///
    /// ```
    /// let data = b"scope 0\n\nscope 1";
    /// let mut reader = cactus_export::store::Reader::new(&data[..]);
    ///
    /// let lines = reader.lines().collect::<Result<Vec<_>, _>>()?;
    /// assert_eq!(lines.len(), 3);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn lines(&mut self) -> impl Iterator<Item = Result<Line, Error>> + '_ {
        let mut buffer = String::new();
        iter::from_fn(move || self.read_line(&mut buffer).transpose())
    }

    /// Consumes the remaining lines to build a [`Graph`].
    ///
    /// # Examples
    ///
    /// ```
    /// let data = b"scope 0\nscope 1\ngroup g0 0 1\n";
    /// let mut reader = cactus_export::store::Reader::new(&data[..]);
    ///
    /// let graph = reader.graph()?;
    /// let root = graph.scope_by_name("0").unwrap();
    /// assert_eq!(graph.children(root).count(), 1);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn graph(&mut self) -> Result<Graph, Error> {
        let mut builder = Builder::default();
        let mut buffer = String::new();

        while let Some(line) = self.read_line(&mut buffer)? {
            builder = line
                .apply(builder)
                .map_err(|err| Error::Graph(self.line_number, err))?;
        }

        let graph = builder.try_build().map_err(Error::Build)?;
        tracing::debug!(lines = self.line_number, "loaded alignment graph");

        Ok(graph)
    }
}

impl<T> From<T> for Reader<T>
where
    T: BufRead,
{
    fn from(inner: T) -> Self {
        Self {
            inner,
            line_number: 0,
        }
    }
}

/// Reads a line from a buffered reader, stripping the line terminator.
fn read_line<T>(reader: &mut T, buffer: &mut String) -> io::Result<usize>
where
    T: BufRead,
{
    buffer.clear();

    match reader.read_line(buffer) {
        Ok(0) => Ok(0),
        Ok(n) => {
            if buffer.ends_with(NEW_LINE) {
                buffer.pop();

                if buffer.ends_with(CARRIAGE_RETURN) {
                    buffer.pop();
                }
            }

            Ok(n)
        }
        Err(e) => Err(e),
    }
}
