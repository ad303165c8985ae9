//! A line within a graph dump.

use std::num::ParseIntError;
use std::str::FromStr;

use nonempty::NonEmpty;
use omics::coordinate::Strand;
use omics::coordinate::strand;

use crate::graph::Builder;
use crate::graph::builder;

/// The prefix of a comment line.
pub const COMMENT_PREFIX: char = '#';

/// The placeholder used in optional reference fields.
pub const ABSENT: &str = "-";

////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////

/// An error associated with parsing a line.
#[derive(Debug)]
pub enum ParseError {
    /// The line starts with an unrecognized keyword.
    UnknownKeyword(String),

    /// A required field is missing.
    MissingField(&'static str, &'static str),

    /// A field that must be an integer is not.
    InvalidInteger(&'static str, ParseIntError),

    /// An invalid strand.
    InvalidStrand(strand::Error),

    /// The line carries more fields than its keyword accepts.
    TrailingFields(&'static str),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::UnknownKeyword(keyword) => write!(f, "unknown keyword: {keyword}"),
            ParseError::MissingField(keyword, field) => {
                write!(f, "missing field in {keyword} line: {field}")
            }
            ParseError::InvalidInteger(field, err) => write!(f, "invalid {field}: {err}"),
            ParseError::InvalidStrand(err) => write!(f, "invalid strand: {err}"),
            ParseError::TrailingFields(keyword) => {
                write!(f, "unexpected trailing fields in {keyword} line")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// A [`Result`](std::result::Result) with a [`ParseError`].
type Result<T> = std::result::Result<T, ParseError>;

////////////////////////////////////////////////////////////////////////////////////////
// Fields
////////////////////////////////////////////////////////////////////////////////////////

/// A cursor over the whitespace-delimited fields of a line.
struct Fields<'a> {
    /// The keyword of the line being parsed.
    keyword: &'static str,

    /// The unparsed remainder of the line.
    rest: &'a str,
}

impl<'a> Fields<'a> {
    /// Takes the next field (if it exists).
    fn optional(&mut self) -> Option<&'a str> {
        let rest = self.rest.trim_start();

        if rest.is_empty() {
            self.rest = rest;
            return None;
        }

        let (field, rest) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
        self.rest = rest;

        Some(field)
    }

    /// Takes the next field.
    fn required(&mut self, name: &'static str) -> Result<&'a str> {
        self.optional()
            .ok_or(ParseError::MissingField(self.keyword, name))
    }

    /// Takes the next field as an integer.
    fn integer(&mut self, name: &'static str) -> Result<i64> {
        self.required(name)?
            .parse()
            .map_err(|err| ParseError::InvalidInteger(name, err))
    }

    /// Takes the next field as a reference that may be [`ABSENT`].
    fn reference(&mut self, name: &'static str) -> Result<Option<String>> {
        self.required(name).map(|field| match field {
            ABSENT => None,
            field => Some(field.to_string()),
        })
    }

    /// Takes the remainder of the line verbatim.
    fn remainder(&mut self) -> &'a str {
        let rest = self.rest.trim();
        self.rest = "";
        rest
    }

    /// Ensures no fields remain.
    fn finish(mut self) -> Result<()> {
        match self.optional() {
            Some(_) => Err(ParseError::TrailingFields(self.keyword)),
            None => Ok(()),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Line
////////////////////////////////////////////////////////////////////////////////////////

/// A line within a graph dump.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Line {
    /// A blank or comment line.
    Empty,

    /// A scope declaration.
    Scope {
        /// The scope name.
        name: String,
    },

    /// A sequence declaration.
    Sequence {
        /// The sequence name.
        name: String,

        /// The genome identifier.
        genome: String,

        /// The absolute coordinate of the first base.
        start: i64,

        /// The length.
        length: i64,

        /// The free-text header.
        header: String,
    },

    /// A group declaration.
    Group {
        /// The group name.
        name: String,

        /// The owning scope.
        scope: String,

        /// The nested child scope.
        nested: Option<String>,
    },

    /// An end declaration.
    End {
        /// The end name.
        name: String,

        /// The enclosing group.
        group: Option<String>,
    },

    /// A link declaration.
    Link {
        /// The group carrying the link.
        group: String,

        /// The 5' end.
        end5: String,

        /// The 3' end.
        end3: String,
    },

    /// A block declaration.
    Block {
        /// The block name.
        name: String,

        /// The owning scope.
        scope: String,

        /// The block length.
        length: i64,

        /// The 5' end.
        end5: String,

        /// The 3' end.
        end3: String,
    },

    /// A segment declaration.
    Segment {
        /// The owning block.
        block: String,

        /// The owning sequence.
        sequence: Option<String>,

        /// The strand.
        strand: Strand,

        /// The leftmost absolute coordinate.
        start: i64,
    },

    /// A chain declaration.
    Chain {
        /// The chain name.
        name: String,

        /// The owning scope.
        scope: String,

        /// The blocks in chain order.
        blocks: NonEmpty<String>,
    },
}

impl Line {
    /// Applies this line to a graph [`Builder`].
    ///
    /// # Examples
    ///
    /// ```
    /// use cactus_export::graph::Builder;
    /// use cactus_export::store::Line;
    ///
    /// let builder = "scope 0".parse::<Line>()?.apply(Builder::default())?;
    /// let graph = "scope 1".parse::<Line>()?.apply(builder)?.try_build()?;
    ///
    /// assert!(graph.scope_by_name("1").is_some());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn apply(self, builder: Builder) -> std::result::Result<Builder, builder::Error> {
        match self {
            Line::Empty => Ok(builder),
            Line::Scope { name } => builder.scope(&name),
            Line::Sequence {
                name,
                genome,
                start,
                length,
                header,
            } => builder.sequence(&name, &genome, start, length, &header),
            Line::Group {
                name,
                scope,
                nested,
            } => builder.group(&name, &scope, nested.as_deref()),
            Line::End { name, group } => builder.end(&name, group.as_deref()),
            Line::Link { group, end5, end3 } => builder.link(&group, &end5, &end3),
            Line::Block {
                name,
                scope,
                length,
                end5,
                end3,
            } => builder.block(&name, &scope, length, &end5, &end3),
            Line::Segment {
                block,
                sequence,
                strand,
                start,
            } => builder.segment(&block, sequence.as_deref(), strand, start),
            Line::Chain {
                name,
                scope,
                blocks,
            } => builder.chain(&name, &scope, blocks.iter().map(String::as_str)),
        }
    }
}

impl FromStr for Line {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();

        if s.is_empty() || s.starts_with(COMMENT_PREFIX) {
            return Ok(Line::Empty);
        }

        let (keyword, rest) = s.split_once(char::is_whitespace).unwrap_or((s, ""));

        let line = match keyword {
            "scope" => {
                let mut fields = Fields {
                    keyword: "scope",
                    rest,
                };

                let line = Line::Scope {
                    name: fields.required("name")?.to_string(),
                };

                fields.finish()?;
                line
            }
            "sequence" => {
                let mut fields = Fields {
                    keyword: "sequence",
                    rest,
                };

                Line::Sequence {
                    name: fields.required("name")?.to_string(),
                    genome: fields.required("genome")?.to_string(),
                    start: fields.integer("start")?,
                    length: fields.integer("length")?,
                    header: fields.remainder().to_string(),
                }
            }
            "group" => {
                let mut fields = Fields {
                    keyword: "group",
                    rest,
                };

                let line = Line::Group {
                    name: fields.required("name")?.to_string(),
                    scope: fields.required("scope")?.to_string(),
                    nested: fields.optional().map(String::from),
                };

                fields.finish()?;
                line
            }
            "end" => {
                let mut fields = Fields {
                    keyword: "end",
                    rest,
                };

                let line = Line::End {
                    name: fields.required("name")?.to_string(),
                    group: fields.reference("group")?,
                };

                fields.finish()?;
                line
            }
            "link" => {
                let mut fields = Fields {
                    keyword: "link",
                    rest,
                };

                let line = Line::Link {
                    group: fields.required("group")?.to_string(),
                    end5: fields.required("5' end")?.to_string(),
                    end3: fields.required("3' end")?.to_string(),
                };

                fields.finish()?;
                line
            }
            "block" => {
                let mut fields = Fields {
                    keyword: "block",
                    rest,
                };

                let line = Line::Block {
                    name: fields.required("name")?.to_string(),
                    scope: fields.required("scope")?.to_string(),
                    length: fields.integer("length")?,
                    end5: fields.required("5' end")?.to_string(),
                    end3: fields.required("3' end")?.to_string(),
                };

                fields.finish()?;
                line
            }
            "segment" => {
                let mut fields = Fields {
                    keyword: "segment",
                    rest,
                };

                let line = Line::Segment {
                    block: fields.required("block")?.to_string(),
                    sequence: fields.reference("sequence")?,
                    strand: fields
                        .required("strand")?
                        .parse::<Strand>()
                        .map_err(ParseError::InvalidStrand)?,
                    start: fields.integer("start")?,
                };

                fields.finish()?;
                line
            }
            "chain" => {
                let mut fields = Fields {
                    keyword: "chain",
                    rest,
                };

                let name = fields.required("name")?.to_string();
                let scope = fields.required("scope")?.to_string();
                let mut blocks = NonEmpty::new(fields.required("block")?.to_string());

                while let Some(block) = fields.optional() {
                    blocks.push(block.to_string());
                }

                Line::Chain {
                    name,
                    scope,
                    blocks,
                }
            }
            keyword => return Err(ParseError::UnknownKeyword(keyword.to_string())),
        };

        Ok(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_parses_blank_and_comment_lines() -> std::result::Result<(), Box<dyn std::error::Error>> {
        assert_eq!("".parse::<Line>()?, Line::Empty);
        assert_eq!("   ".parse::<Line>()?, Line::Empty);
        assert_eq!("# scope 0".parse::<Line>()?, Line::Empty);
        Ok(())
    }

    #[test]
    fn it_parses_a_sequence_with_a_multi_word_header()
    -> std::result::Result<(), Box<dyn std::error::Error>> {
        let line = "sequence s0 hg18 10 500 hg18.chr7.158821424.1000 some description"
            .parse::<Line>()?;

        assert_eq!(
            line,
            Line::Sequence {
                name: String::from("s0"),
                genome: String::from("hg18"),
                start: 10,
                length: 500,
                header: String::from("hg18.chr7.158821424.1000 some description"),
            }
        );

        Ok(())
    }

    #[test]
    fn it_parses_a_sequence_without_a_header()
    -> std::result::Result<(), Box<dyn std::error::Error>> {
        let line = "sequence s0 hg18 0 5".parse::<Line>()?;
        assert!(matches!(line, Line::Sequence { header, .. } if header.is_empty()));
        Ok(())
    }

    #[test]
    fn it_parses_absent_references() -> std::result::Result<(), Box<dyn std::error::Error>> {
        assert_eq!(
            "end e0 -".parse::<Line>()?,
            Line::End {
                name: String::from("e0"),
                group: None
            }
        );

        assert_eq!(
            "segment b0 - - 7".parse::<Line>()?,
            Line::Segment {
                block: String::from("b0"),
                sequence: None,
                strand: Strand::Negative,
                start: 7,
            }
        );

        Ok(())
    }

    #[test]
    fn it_parses_a_chain() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let line = "chain c0 0 b0 b1 b2".parse::<Line>()?;

        match line {
            Line::Chain { blocks, .. } => {
                assert_eq!(blocks.len(), 3);
                assert_eq!(blocks.last(), "b2");
            }
            line => panic!("unexpected line: {line:?}"),
        }

        Ok(())
    }

    #[test]
    fn it_fails_on_an_unknown_keyword() {
        let err = "cap c0".parse::<Line>().unwrap_err();
        assert_eq!(err.to_string(), "unknown keyword: cap");
    }

    #[test]
    fn it_fails_on_a_missing_field() {
        let err = "block b0 0 5 e0".parse::<Line>().unwrap_err();
        assert_eq!(err.to_string(), "missing field in block line: 3' end");
    }

    #[test]
    fn it_fails_on_an_invalid_integer() {
        let err = "block b0 0 five e0 e1".parse::<Line>().unwrap_err();
        assert!(matches!(err, ParseError::InvalidInteger("length", _)));
    }

    #[test]
    fn it_fails_on_an_invalid_strand() {
        let err = "segment b0 s0 ? 7".parse::<Line>().unwrap_err();
        assert!(matches!(err, ParseError::InvalidStrand(_)));
    }

    #[test]
    fn it_fails_on_trailing_fields() {
        let err = "link g0 e0 e1 e2".parse::<Line>().unwrap_err();
        assert_eq!(err.to_string(), "unexpected trailing fields in link line");
    }
}
