use std::path::Path;
use swc_common::DUMMY_SP;
use swc_ecma_ast::*;
use swc_ecma_visit::{Fold, FoldWith};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::parser::parse_module;

/// 生成したルーティングを公開する仮想モジュールの ID
pub const VIRTUAL_MODULE_ID: &str = "virtual:convention-import-routes";

/// エントリファイル内で router を束縛するローカル名
pub const ROUTER_BINDING: &str = "router";

const BOOTSTRAP_FN: &str = "createApp";
const APP_ROOT: &str = "App";
const USE_METHOD: &str = "use";

/// `createApp(App)` の書き換え状況
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Bootstrap {
    #[default]
    Missing,
    Rewritten,
    AlreadyWrapped,
}

/// 最初に見つかった `createApp(App)` を `createApp(App).use(router)` に置き換える Fold
#[derive(Default)]
struct BootstrapRewriter {
    state: Bootstrap,
}

impl Fold for BootstrapRewriter {
    fn fold_expr(&mut self, expr: Expr) -> Expr {
        if self.state != Bootstrap::Missing {
            return expr;
        }

        match expr {
            Expr::Call(call) if is_router_use(&call) => {
                self.state = Bootstrap::AlreadyWrapped;
                Expr::Call(call)
            }
            Expr::Call(call) if is_bootstrap_call(&call) => {
                self.state = Bootstrap::Rewritten;
                Expr::Call(use_router(call))
            }
            other => other.fold_children_with(self),
        }
    }
}

/// エントリファイルのソースに router の import と `.use(router)` を組み込む
///
/// すでに組み込み済みの部分には手を付けない。何も変更がなければ入力をそのまま返す。
/// `createApp(App)` が見つからない場合は中途半端な出力をせずにエラーにする。
pub fn transform_entry(code: &str, file: &Path) -> Result<String> {
    let mut parsed = parse_module(code, file)?;

    let has_import = parsed.module.body.iter().any(is_router_import);
    if !has_import && parsed.module.body.iter().any(declares_router) {
        return Err(Error::RouterBindingConflict {
            file: file.to_path_buf(),
        });
    }

    let mut rewriter = BootstrapRewriter::default();
    let mut module = parsed.module.clone().fold_with(&mut rewriter);

    match rewriter.state {
        Bootstrap::Missing => {
            return Err(Error::BootstrapNotFound {
                file: file.to_path_buf(),
            });
        }
        Bootstrap::AlreadyWrapped if has_import => {
            debug!(file = %file.display(), "すでに変換済みのためスキップ");
            return Ok(code.to_string());
        }
        _ => {}
    }

    if !has_import {
        let import = parsed.parse_snippet(
            "<convention-routes-import>",
            &format!("import {ROUTER_BINDING} from '{VIRTUAL_MODULE_ID}';"),
        )?;
        module.body.splice(0..0, import);
    }

    parsed.module = module;
    let output = parsed.emit()?;

    info!(
        file = %file.display(),
        import_inserted = !has_import,
        bootstrap_rewritten = rewriter.state == Bootstrap::Rewritten,
        "エントリファイルに router を組み込みました"
    );
    Ok(output)
}

fn ident_named(expr: &Expr, name: &str) -> bool {
    matches!(expr, Expr::Ident(ident) if &*ident.sym == name)
}

/// `createApp(App, ...)`
fn is_bootstrap_call(call: &CallExpr) -> bool {
    let Callee::Expr(callee) = &call.callee else {
        return false;
    };
    ident_named(callee, BOOTSTRAP_FN)
        && call
            .args
            .first()
            .is_some_and(|arg| arg.spread.is_none() && ident_named(&arg.expr, APP_ROOT))
}

/// `createApp(App).use(router)`
fn is_router_use(call: &CallExpr) -> bool {
    let Callee::Expr(callee) = &call.callee else {
        return false;
    };
    let Expr::Member(member) = &**callee else {
        return false;
    };
    let MemberProp::Ident(prop) = &member.prop else {
        return false;
    };

    &*prop.sym == USE_METHOD
        && matches!(&*member.obj, Expr::Call(inner) if is_bootstrap_call(inner))
        && call.args.len() == 1
        && ident_named(&call.args[0].expr, ROUTER_BINDING)
}

/// `import router from 'virtual:convention-import-routes'`
fn is_router_import(item: &ModuleItem) -> bool {
    let ModuleItem::ModuleDecl(ModuleDecl::Import(decl)) = item else {
        return false;
    };
    &*decl.src.value == VIRTUAL_MODULE_ID
        && decl.specifiers.iter().any(|spec| {
            matches!(spec, ImportSpecifier::Default(default) if &*default.local.sym == ROUTER_BINDING)
        })
}

/// トップレベルで `router` という名前を束縛しているか (import / 変数 / 関数 / クラス)
fn declares_router(item: &ModuleItem) -> bool {
    let decl = match item {
        ModuleItem::ModuleDecl(ModuleDecl::Import(import)) => {
            return import.specifiers.iter().any(|spec| {
                let local = match spec {
                    ImportSpecifier::Named(named) => &named.local,
                    ImportSpecifier::Default(default) => &default.local,
                    ImportSpecifier::Namespace(namespace) => &namespace.local,
                };
                &*local.sym == ROUTER_BINDING
            });
        }
        ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => &export.decl,
        ModuleItem::Stmt(Stmt::Decl(decl)) => decl,
        _ => return false,
    };

    match decl {
        Decl::Var(var) => var.decls.iter().any(
            |declarator| matches!(&declarator.name, Pat::Ident(binding) if &*binding.id.sym == ROUTER_BINDING),
        ),
        Decl::Fn(func) => &*func.ident.sym == ROUTER_BINDING,
        Decl::Class(class) => &*class.ident.sym == ROUTER_BINDING,
        _ => false,
    }
}

fn use_router(bootstrap: CallExpr) -> CallExpr {
    CallExpr {
        span: bootstrap.span,
        callee: Callee::Expr(Box::new(Expr::Member(MemberExpr {
            span: bootstrap.span,
            obj: Box::new(Expr::Call(bootstrap)),
            prop: MemberProp::Ident(Ident::new(USE_METHOD.into(), DUMMY_SP)),
        }))),
        args: vec![ExprOrSpread {
            spread: None,
            expr: Box::new(Expr::Ident(Ident::new(ROUTER_BINDING.into(), DUMMY_SP))),
        }],
        type_args: None,
    }
}
