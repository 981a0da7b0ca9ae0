use super::{is_ident_byte, join_comments, Parser, RuleFn};
use crate::ast::{
    Comments, Const, Enum, EnumItem, Field, Function, Include, Namespace, Qualifier, Service,
    StructLike, Subject, Typedef,
};
use crate::error::Rule;
use crate::options::DuplicateFieldIds;
use std::collections::HashSet;

impl<'src> Parser<'src> {
    /// One top-level declaration.
    pub(crate) fn subject(&mut self) -> Rule<Subject> {
        let rules: [RuleFn<'src, Subject>; 9] = [
            Self::namespace,
            Self::include,
            Self::typedef,
            Self::constant,
            Self::enumeration,
            Self::structure,
            Self::union,
            Self::exception,
            Self::service,
        ];
        self.choice("declaration", &rules)
    }

    // -- Declarations -------------------------------------------

    /// `namespace <scope> <dotted.path>`; the scope may be `*`.
    fn namespace(&mut self) -> Rule<Subject> {
        let head = self.take_head_comments();
        self.keyword("namespace")?;
        let scope = self
            .scanner
            .take_while(|b| is_ident_byte(b) || b == b'*')
            .to_owned();
        if scope.is_empty() {
            return Err(self.expected("namespace scope"));
        }
        self.skip();
        let path = self.path()?.join(".");
        self.separator();
        Ok(Subject::Namespace(Namespace {
            scope,
            path,
            comments: Comments {
                head,
                tail: self.take_tail_comments(),
            },
        }))
    }

    /// `include "<path>"`; the module name drops directories and `.thrift`.
    fn include(&mut self) -> Rule<Subject> {
        let head = self.take_head_comments();
        self.keyword("include")?;
        let path = self.quoted(false)?.to_owned();
        self.skip();
        self.separator();
        Ok(Subject::Include(Include {
            module: module_name(&path).to_owned(),
            path,
            comments: Comments {
                head,
                tail: self.take_tail_comments(),
            },
        }))
    }

    fn typedef(&mut self) -> Rule<Subject> {
        let head = self.take_head_comments();
        self.keyword("typedef")?;
        let type_ = self.type_ref()?;
        let name = self.name()?;
        self.separator();
        Ok(Subject::Typedef(Typedef {
            type_,
            name,
            comments: Comments {
                head,
                tail: self.take_tail_comments(),
            },
        }))
    }

    fn constant(&mut self) -> Rule<Subject> {
        let head = self.take_head_comments();
        self.keyword("const")?;
        let type_ = self.type_ref()?;
        let name = self.name()?;
        self.punct(b'=')?;
        let value = self.literal()?;
        self.separator();
        Ok(Subject::Const(Const {
            type_,
            name,
            value,
            comments: Comments {
                head,
                tail: self.take_tail_comments(),
            },
        }))
    }

    /// `enum <name> { A, B = 5, C }`. Omitted values continue from the
    /// previous value, starting at 0.
    fn enumeration(&mut self) -> Rule<Subject> {
        let head = self.take_head_comments();
        self.keyword("enum")?;
        let name = self.name()?;
        self.punct(b'{')?;
        let header_tail = self.take_tail_comments();
        let raw_items = self.repeat(Self::enum_item);
        self.close(b'}')?;
        self.separator();

        let mut items = Vec::with_capacity(raw_items.len());
        // `None` once the previous value was i64::MAX.
        let mut next = Some(0i64);
        for (item_name, explicit, comments) in raw_items {
            let value = match explicit.or(next) {
                Some(v) => v,
                None => {
                    let message = format!("enum {} overflows at {}", name, item_name);
                    return Err(self.invalid(message));
                }
            };
            next = value.checked_add(1);
            items.push(EnumItem {
                name: item_name,
                value,
                comments,
            });
        }

        Ok(Subject::Enum(Enum {
            name,
            items,
            comments: Comments {
                head,
                tail: join_comments(header_tail, self.take_tail_comments()),
            },
        }))
    }

    fn enum_item(&mut self) -> Rule<(String, Option<i64>, Comments)> {
        let head = self.take_head_comments();
        let name = self.name()?;
        let value = match self.assignment() {
            Some(literal) => match literal.as_i64() {
                Some(n) => Some(n),
                None => {
                    return Err(self.invalid(format!(
                        "enum value of {} must be an integer, got {:?}",
                        name, literal
                    )))
                }
            },
            None => None,
        };
        self.separator();
        let tail = self.take_tail_comments();
        Ok((name, value, Comments { head, tail }))
    }

    fn structure(&mut self) -> Rule<Subject> {
        self.struct_like("struct").map(Subject::Struct)
    }

    fn union(&mut self) -> Rule<Subject> {
        self.struct_like("union").map(Subject::Union)
    }

    fn exception(&mut self) -> Rule<Subject> {
        self.struct_like("exception").map(Subject::Exception)
    }

    /// `<keyword> <name> { <field>* }`
    fn struct_like(&mut self, keyword: &'static str) -> Rule<StructLike> {
        let head = self.take_head_comments();
        self.keyword(keyword)?;
        let name = self.name()?;
        self.punct(b'{')?;
        let header_tail = self.take_tail_comments();
        let fields = self.repeat(Self::field);
        self.close(b'}')?;
        self.check_field_ids(&name, &fields)?;
        self.separator();
        Ok(StructLike {
            name,
            fields,
            comments: Comments {
                head,
                tail: join_comments(header_tail, self.take_tail_comments()),
            },
        })
    }

    /// `service <name> [extends <path>] { <function>* }`
    fn service(&mut self) -> Rule<Subject> {
        let head = self.take_head_comments();
        self.keyword("service")?;
        let name = self.name()?;
        let extends = self.attempt(|p| {
            p.keyword("extends")?;
            p.path()
        });
        self.punct(b'{')?;
        let header_tail = self.take_tail_comments();
        let functions = self.repeat_keyed(Self::function, |f| f.name.clone());
        self.close(b'}')?;
        self.separator();
        Ok(Subject::Service(Service {
            name,
            extends: extends.map(|segments| segments.join(".")),
            functions,
            comments: Comments {
                head,
                tail: join_comments(header_tail, self.take_tail_comments()),
            },
        }))
    }

    // -- Items --------------------------------------------------

    /// `[<id>:] [required|optional] <type> <name> [= <value>] [,|;]`
    fn field(&mut self) -> Rule<Field> {
        let head = self.take_head_comments();
        let id = self.attempt(|p| {
            let id = p.integer()?;
            p.punct(b':')?;
            Ok(id)
        });
        let qualifier = self.attempt(|p| {
            if p.keyword("required").is_ok() {
                return Ok(Qualifier::Required);
            }
            p.keyword("optional")?;
            Ok(Qualifier::Optional)
        });
        let type_ = self.type_ref()?;
        let name = self.name()?;
        let default = self.assignment();
        self.separator();
        Ok(Field {
            id,
            qualifier,
            type_,
            name,
            default,
            comments: Comments {
                head,
                tail: self.take_tail_comments(),
            },
        })
    }

    /// `[oneway] <type> <name> ( <field>* ) [throws ( <field>* )] [,|;]`
    fn function(&mut self) -> Rule<Function> {
        let head = self.take_head_comments();
        let oneway = self.attempt(|p| p.keyword("oneway")).is_some();
        let returns = self.type_ref()?;
        let name = self.name()?;
        let args = self.field_list()?;
        let throws = self
            .attempt(|p| {
                p.keyword("throws")?;
                p.field_list()
            })
            .unwrap_or_default();
        self.separator();
        Ok(Function {
            oneway,
            returns,
            name,
            args,
            throws,
            comments: Comments {
                head,
                tail: self.take_tail_comments(),
            },
        })
    }

    /// `( <field>* )`, as used by argument and throws lists.
    fn field_list(&mut self) -> Rule<Vec<Field>> {
        self.punct(b'(')?;
        let fields = self.repeat(Self::field);
        self.close(b')')?;
        self.check_field_ids("argument list", &fields)?;
        Ok(fields)
    }

    fn check_field_ids(&mut self, owner: &str, fields: &[Field]) -> Rule<()> {
        if self.options.duplicate_field_ids == DuplicateFieldIds::Keep {
            return Ok(());
        }
        let mut seen = HashSet::new();
        for field in fields {
            if let Some(id) = field.id {
                if !seen.insert(id) {
                    return Err(self.invalid(format!(
                        "duplicate field id {} in {} (field `{}`)",
                        id, owner, field.name
                    )));
                }
            }
        }
        Ok(())
    }
}

/// `../shared/base.thrift` -> `base`.
fn module_name(path: &str) -> &str {
    let file = path.rsplit(|c| c == '/' || c == '\\').next().unwrap_or(path);
    file.strip_suffix(".thrift").unwrap_or(file)
}
