use super::{Parser, RuleFn};
use crate::ast::{ContainerKind, TypeRef};
use crate::error::Rule;

impl<'src> Parser<'src> {
    /// `map<K, V>` | `list<V>` | `set<V>` | bare name. Container parameters
    /// may themselves be containers.
    pub(crate) fn type_ref(&mut self) -> Rule<TypeRef> {
        let rules: [RuleFn<'src, TypeRef>; 3] =
            [Self::map_type, Self::list_like_type, Self::scalar_type];
        self.choice("type", &rules)
    }

    fn map_type(&mut self) -> Rule<TypeRef> {
        self.keyword("map")?;
        self.punct(b'<')?;
        let key = self.type_ref()?;
        self.separator();
        let value = self.type_ref()?;
        self.punct(b'>')?;
        Ok(TypeRef::Map {
            key: Box::new(key),
            value: Box::new(value),
        })
    }

    fn list_like_type(&mut self) -> Rule<TypeRef> {
        let kind = match self.keyword("list") {
            Ok(_) => ContainerKind::List,
            Err(_) => {
                self.keyword("set")?;
                ContainerKind::Set
            }
        };
        self.punct(b'<')?;
        let value = self.type_ref()?;
        self.punct(b'>')?;
        Ok(TypeRef::ListLike {
            kind,
            value: Box::new(value),
        })
    }

    fn scalar_type(&mut self) -> Rule<TypeRef> {
        self.name().map(TypeRef::Scalar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ParseOptions;

    fn ty(src: &str) -> TypeRef {
        let mut p = Parser::new(src, ParseOptions::default());
        p.type_ref().unwrap()
    }

    #[test]
    fn scalar_collapses_to_name() {
        assert_eq!(ty("MyStruct"), TypeRef::scalar("MyStruct"));
        assert_eq!(ty("shared.SharedStruct"), TypeRef::scalar("shared.SharedStruct"));
    }

    #[test]
    fn list_of_string() {
        assert_eq!(
            ty("list<string>"),
            TypeRef::ListLike {
                kind: ContainerKind::List,
                value: Box::new(TypeRef::scalar("string")),
            }
        );
    }

    #[test]
    fn nested_map_with_spaces() {
        let t = ty("map < string , set<i32> >");
        match t {
            TypeRef::Map { key, value } => {
                assert_eq!(*key, TypeRef::scalar("string"));
                assert_eq!(value.name(), "set");
            }
            other => panic!("expected map, got {:?}", other),
        }
    }

    #[test]
    fn container_prefix_is_not_a_container() {
        assert_eq!(ty("mapping"), TypeRef::scalar("mapping"));
        assert_eq!(ty("settings"), TypeRef::scalar("settings"));
    }

    #[test]
    fn bare_container_keyword_without_params_is_scalar() {
        // `list` not followed by `<` falls through to the scalar rule.
        assert_eq!(ty("list x"), TypeRef::scalar("list"));
    }
}
