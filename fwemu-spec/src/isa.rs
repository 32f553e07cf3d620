//! # Instruction-Set Definition
//!
//! An ordered catalog of instruction shapes plus the machine [`Config`]. The
//! opcode of an instruction is its position in the catalog.
//!
//! ## Word layout
//!
//! ```text
//! | opcode (cop_size) | field 0 | field 1 | ... | zero padding |
//! ```
//!
//! Fields follow the opcode contiguously, in the order the catalog declares
//! them; unused trailing bits up to `command_size` are zero.

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;

use crate::bits::{BitVector, MAX_UINT_BITS};
use crate::config::Config;
use crate::error::{IsaError, Result};
use crate::instruction::{
    Instruction, InstructionKind, COMMAND_ADDRESS, FIRST_OPERAND, FIRST_REGISTER, LITERAL,
    MEMORY_ADDRESS, REGISTER_ADDRESS, SECOND_OPERAND, SECOND_REGISTER,
};

/// One operand field of an instruction shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub width: u32,
}

impl Field {
    pub fn new(name: impl Into<String>, width: u32) -> Self {
        Self { name: name.into(), width }
    }
}

/// Named, ordered operand layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    pub name: String,
    pub kind: InstructionKind,
    pub fields: Vec<Field>,
}

impl Shape {
    pub fn new(name: impl Into<String>, fields: Vec<Field>) -> Self {
        let name = name.into();
        let kind = InstructionKind::from_mnemonic(&name);
        Self { name, kind, fields }
    }

    /// Number of operands
    #[inline]
    pub fn arity(&self) -> usize {
        self.fields.len()
    }

    /// Total operand width in bits
    pub fn operand_bits(&self) -> u64 {
        self.fields.iter().map(|f| f.width as u64).sum()
    }

    /// Offset (relative to the end of the opcode) and width of a named field
    pub fn field_span(&self, name: &str) -> Option<(usize, usize)> {
        let mut offset = 0usize;
        for field in &self.fields {
            if field.name == name {
                return Some((offset, field.width as usize));
            }
            offset += field.width as usize;
        }
        None
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", field.name, field.width)?;
        }
        f.write_str(")")
    }
}

/// Catalog of instruction shapes plus machine geometry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionSet {
    pub commands: Vec<Shape>,
    pub config: Config,
}

impl InstructionSet {
    /// Build and validate an instruction set
    pub fn new(commands: Vec<Shape>, config: Config) -> Result<Self> {
        let isa = Self { commands, config };
        isa.validate()?;
        Ok(isa)
    }

    /// Load from a JSON document
    ///
    /// ```json
    /// {
    ///   "commands": [{"NOP": {}}, {"DECR": {"register_address": 2}}],
    ///   "commands_size": 3, "command_size": 8, "cop_size": 2,
    ///   "memory_size": 2, "register_file": 2, "literal_size": 4
    /// }
    /// ```
    pub fn from_json(text: &str) -> Result<Self> {
        let raw: RawInstructionSet = serde_json::from_str(text)?;
        Self::new(raw.commands, raw.config)
    }

    pub fn validate(&self) -> Result<()> {
        self.config.validate()?;

        if self.commands.len() as u128 > self.config.opcode_capacity() {
            return Err(IsaError::TooManyCommands {
                count: self.commands.len(),
                cop_size: self.config.cop_size,
            });
        }

        for shape in &self.commands {
            let mut seen = HashSet::new();
            for field in &shape.fields {
                if field.width == 0 || field.width as usize > MAX_UINT_BITS {
                    return Err(IsaError::FieldWidth {
                        command: shape.name.clone(),
                        field: field.name.clone(),
                        width: field.width,
                    });
                }
                if !seen.insert(field.name.as_str()) {
                    return Err(IsaError::DuplicateField {
                        command: shape.name.clone(),
                        field: field.name.clone(),
                    });
                }
            }

            let bits = self.config.cop_size as u64 + shape.operand_bits();
            if bits > self.config.command_size as u64 {
                return Err(IsaError::ShapeTooWide {
                    command: shape.name.clone(),
                    bits,
                    command_size: self.config.command_size,
                });
            }

            if let Some(required) = shape.kind.required_fields() {
                let declared: HashSet<&str> = shape.fields.iter().map(|f| f.name.as_str()).collect();
                let expected: HashSet<&str> = required.iter().copied().collect();
                if declared != expected {
                    return Err(IsaError::ShapeMismatch {
                        command: shape.name.clone(),
                        expected: required.join(", "),
                    });
                }
            }
        }

        Ok(())
    }

    /// Opcode and shape for a mnemonic
    pub fn get_command_by_name(&self, name: &str) -> Option<(usize, &Shape)> {
        self.commands
            .iter()
            .enumerate()
            .find(|(_, shape)| shape.name == name)
    }

    /// Shape at an opcode position
    #[inline]
    pub fn shape(&self, opcode: usize) -> Option<&Shape> {
        self.commands.get(opcode)
    }

    /// Opcode value of an instruction word
    pub fn opcode(&self, word: &BitVector) -> u64 {
        word.slice(0, self.config.cop_size as usize)
            .map(|bits| bits.to_uint())
            .unwrap_or(0)
    }

    /// Decode an instruction word into a typed instruction.
    ///
    /// Opcodes past the end of the catalog, and catalog entries with no bound
    /// behaviour, decode to [`Instruction::Unknown`].
    pub fn decode(&self, word: &BitVector) -> Instruction {
        let opcode = self.opcode(word);
        let shape = match usize::try_from(opcode).ok().and_then(|op| self.shape(op)) {
            Some(shape) => shape,
            None => return Instruction::Unknown { opcode },
        };
        let fields = Operands {
            word,
            shape,
            base: self.config.cop_size as usize,
        };

        match shape.kind {
            InstructionKind::Nop => Instruction::Nop,
            InstructionKind::Ltm => Instruction::Ltm {
                memory_address: fields.index(MEMORY_ADDRESS),
                literal: fields.bits(LITERAL),
            },
            InstructionKind::Mtr => Instruction::Mtr {
                memory_address: fields.index(MEMORY_ADDRESS),
                register_address: fields.index(REGISTER_ADDRESS),
            },
            InstructionKind::Jmpif => Instruction::Jmpif {
                command_address: fields.index(COMMAND_ADDRESS),
            },
            InstructionKind::Mult => Instruction::Mult {
                first_operand: fields.index(FIRST_OPERAND),
                second_operand: fields.index(SECOND_OPERAND),
                register_address: fields.index(REGISTER_ADDRESS),
            },
            InstructionKind::Rtm => Instruction::Rtm {
                memory_address: fields.index(MEMORY_ADDRESS),
                register_address: fields.index(REGISTER_ADDRESS),
            },
            InstructionKind::Decr => Instruction::Decr {
                register_address: fields.index(REGISTER_ADDRESS),
            },
            InstructionKind::Jmp => Instruction::Jmp {
                command_address: fields.index(COMMAND_ADDRESS),
            },
            InstructionKind::Push => Instruction::Push {
                register_address: fields.index(REGISTER_ADDRESS),
            },
            InstructionKind::Pop => Instruction::Pop {
                register_address: fields.index(REGISTER_ADDRESS),
            },
            InstructionKind::Ltra => Instruction::Ltra {
                literal: fields.bits(LITERAL),
            },
            InstructionKind::Ret => Instruction::Ret,
            InstructionKind::Pushra => Instruction::Pushra,
            InstructionKind::Popra => Instruction::Popra,
            InstructionKind::Rtr => Instruction::Rtr {
                first_register: fields.index(FIRST_REGISTER),
                second_register: fields.index(SECOND_REGISTER),
            },
            InstructionKind::Unknown => Instruction::Unknown { opcode },
        }
    }

    /// Raw operand values of an instruction word, in declared field order.
    ///
    /// Returns `None` for opcodes outside the catalog.
    pub fn operand_values(&self, word: &BitVector) -> Option<(usize, Vec<u64>)> {
        let opcode = usize::try_from(self.opcode(word)).ok()?;
        let shape = self.shape(opcode)?;
        let mut offset = self.config.cop_size as usize;
        let mut values = Vec::with_capacity(shape.arity());
        for field in &shape.fields {
            let width = field.width as usize;
            values.push(word.slice(offset, width).map(|b| b.to_uint()).unwrap_or(0));
            offset += width;
        }
        Some((opcode, values))
    }
}

impl fmt::Display for InstructionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "InstructionSet({})", self.config)?;
        for (i, shape) in self.commands.iter().enumerate() {
            writeln!(f, "\t{:02}: {}", i, shape)?;
        }
        Ok(())
    }
}

/// Field extraction for one instruction word
struct Operands<'a> {
    word: &'a BitVector,
    shape: &'a Shape,
    base: usize,
}

impl Operands<'_> {
    fn bits(&self, name: &str) -> BitVector {
        self.shape
            .field_span(name)
            .and_then(|(offset, width)| self.word.slice(self.base + offset, width))
            .unwrap_or_default()
    }

    fn index(&self, name: &str) -> usize {
        usize::try_from(self.bits(name).to_uint()).unwrap_or(usize::MAX)
    }
}

#[derive(Deserialize)]
struct RawInstructionSet {
    commands: Vec<Shape>,
    #[serde(flatten)]
    config: Config,
}

/// Field map in document order; `null` reads as no fields
struct FieldList(Vec<Field>);

impl<'de> Deserialize<'de> for FieldList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct FieldListVisitor;

        impl<'de> Visitor<'de> for FieldListVisitor {
            type Value = FieldList;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of field name to bit width")
            }

            fn visit_unit<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
                Ok(FieldList(Vec::new()))
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Self::Value, A::Error> {
                let mut fields = Vec::new();
                while let Some((name, width)) = map.next_entry::<String, u32>()? {
                    fields.push(Field { name, width });
                }
                Ok(FieldList(fields))
            }
        }

        deserializer.deserialize_any(FieldListVisitor)
    }
}

impl<'de> Deserialize<'de> for Shape {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct ShapeVisitor;

        impl<'de> Visitor<'de> for ShapeVisitor {
            type Value = Shape;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a single-entry map of instruction name to fields")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Self::Value, A::Error> {
                let (name, fields) = map
                    .next_entry::<String, FieldList>()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                if map.next_key::<String>()?.is_some() {
                    return Err(de::Error::invalid_length(2, &self));
                }
                Ok(Shape::new(name, fields.0))
            }
        }

        deserializer.deserialize_map(ShapeVisitor)
    }
}
