//! Test data builders for creating declarations

use vcd_trace::VariableDecl;

/// Builder for creating test declarations
pub struct DeclBuilder {
    name: String,
    type_name: String,
    width: u32,
}

impl DeclBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            type_name: "wire".to_string(),
            width: 1,
        }
    }

    pub fn type_name(mut self, type_name: &str) -> Self {
        self.type_name = type_name.to_string();
        self
    }

    pub fn width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    pub fn build(self) -> VariableDecl {
        VariableDecl::new(self.name, self.type_name, self.width)
    }
}

/// SPI bus used across tests: two data bytes, chip select, and a command string
pub fn spi_bus() -> Vec<VariableDecl> {
    vec![
        DeclBuilder::new("miso").width(8).build(),
        DeclBuilder::new("mosi").width(8).build(),
        DeclBuilder::new("cs").build(),
        DeclBuilder::new("command").type_name("string").build(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decl_builder() {
        let decl = DeclBuilder::new("bus").type_name("vector").width(16).build();
        assert_eq!(decl.name, "bus");
        assert_eq!(decl.type_name, "vector");
        assert_eq!(decl.width, 16);
    }
}
