// Declaration tree dump, one object per line, two spaces per nesting level

use super::{ObjectId, ObjectKind, ParamMode, SymbolTable};
use std::fmt;

/// Render `root` and everything declared beneath it.
pub fn render_object(table: &SymbolTable, root: ObjectId) -> String {
    ObjectTree { table, root }.to_string()
}

/// Displays an object and, indented below it, everything in its scope
pub struct ObjectTree<'a> {
    pub table: &'a SymbolTable,
    pub root: ObjectId,
}

impl fmt::Display for ObjectTree<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_object(f, self.table, self.root, 0)
    }
}

fn write_object(
    out: &mut fmt::Formatter<'_>,
    table: &SymbolTable,
    id: ObjectId,
    indent: usize,
) -> fmt::Result {
    let object = table.object(id);
    let pad = " ".repeat(indent);

    match &object.kind {
        ObjectKind::Program { .. } => writeln!(out, "{}Program {}", pad, object.name)?,
        ObjectKind::Constant { value } => writeln!(out, "{}Const {} = {}", pad, object.name, value)?,
        ObjectKind::TypeDef { actual } => writeln!(out, "{}Type {} = {}", pad, object.name, actual)?,
        ObjectKind::Variable { ty, .. } => writeln!(out, "{}Var {} : {}", pad, object.name, ty)?,
        ObjectKind::Function { return_type, .. } => match return_type {
            Some(ty) => writeln!(out, "{}Function {} : {}", pad, object.name, ty)?,
            None => writeln!(out, "{}Function {}", pad, object.name)?,
        },
        ObjectKind::Procedure { .. } => writeln!(out, "{}Procedure {}", pad, object.name)?,
        ObjectKind::Parameter { mode, ty, .. } => match mode {
            ParamMode::Value => writeln!(out, "{}Param {} : {}", pad, object.name, ty)?,
            ParamMode::Reference => writeln!(out, "{}Param VAR {} : {}", pad, object.name, ty)?,
        },
    }

    if let Some(scope) = object.scope() {
        for child in table.scope(scope).objects() {
            write_object(out, table, *child, indent + 2)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::SourceLocation;
    use crate::symtab::{ConstantValue, Type};

    #[test]
    fn test_render_nested_declarations() {
        let loc = SourceLocation::new(1, 1);
        let mut table = SymbolTable::new();
        let program = table.create_program("Demo", loc);
        table.enter_block(table.object(program).scope().unwrap());

        let c = table.create_constant("c", loc, ConstantValue::Char('z'));
        table.declare(c).unwrap();
        let t = table.create_type("row", loc, Type::array(4, Type::Int));
        table.declare(t).unwrap();
        let v = table.create_variable("r", loc, Type::alias("row", Type::array(4, Type::Int)));
        table.declare(v).unwrap();

        let f = table.create_function("f", loc);
        table.declare(f).unwrap();
        table.enter_block(table.object(f).scope().unwrap());
        let p = table.create_parameter("n", loc, ParamMode::Reference, Type::Int, f);
        table.declare(p).unwrap();
        table.set_return_type(f, Type::Char);
        table.exit_block();
        table.exit_block();

        let expected = "\
Program Demo
  Const c = 'z'
  Type row = Arr(4,Int)
  Var r : row
  Function f : Char
    Param VAR n : Int
";
        assert_eq!(render_object(&table, program), expected);

        // A subtree renders on its own, indented from its root
        let tree = ObjectTree { table: &table, root: f };
        assert_eq!(format!("{}", tree), "Function f : Char\n  Param VAR n : Int\n");
    }
}
