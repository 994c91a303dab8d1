//! Display text for syntax nodes, one line per graph node.
//!
//! Common expression shapes are rendered structurally so the labels read
//! like the source they came from. Anything else falls back to the token
//! stream with its spacing repaired.

use quote::ToTokens;

/// The entry label of a function: its name and parameter names.
pub(crate) fn fn_signature(function: &syn::ItemFn) -> String {
    let params: Vec<String> = function
        .sig
        .inputs
        .iter()
        .map(|input| match input {
            syn::FnArg::Receiver(_) => "self".to_string(),
            syn::FnArg::Typed(pat_type) => pat(&pat_type.pat),
        })
        .collect();
    format!("fn {}({})", function.sig.ident, params.join(", "))
}

pub(crate) fn local(node: &syn::Local) -> String {
    match &node.init {
        Some(init) => format!("let {} = {}", pat(&node.pat), expr(&init.expr)),
        None => format!("let {}", pat(&node.pat)),
    }
}

pub(crate) fn return_expr(node: &syn::ExprReturn) -> String {
    match &node.expr {
        Some(value) => format!("return {}", expr(value)),
        None => "return".to_string(),
    }
}

/// The synthesized test of a `for` loop: the loop repeats while the pattern
/// still draws elements from the iterable.
pub(crate) fn membership(pat_node: &syn::Pat, iterable: &syn::Expr) -> String {
    format!("{} in {}", pat(pat_node), expr(iterable))
}

pub(crate) fn expr(node: &syn::Expr) -> String {
    match node {
        syn::Expr::Array(array) => format!(
            "[{}]",
            array.elems.iter().map(expr).collect::<Vec<_>>().join(", ")
        ),
        syn::Expr::Assign(assign) => {
            format!("{} = {}", expr(&assign.left), expr(&assign.right))
        }
        syn::Expr::Binary(binary) => format!(
            "{} {} {}",
            expr(&binary.left),
            binary.op.to_token_stream(),
            expr(&binary.right)
        ),
        syn::Expr::Call(call) => format!(
            "{}({})",
            expr(&call.func),
            call.args.iter().map(expr).collect::<Vec<_>>().join(", ")
        ),
        syn::Expr::Cast(cast) => format!("{} as {}", expr(&cast.expr), tokens(&cast.ty)),
        syn::Expr::Field(field) => format!("{}.{}", expr(&field.base), tokens(&field.member)),
        syn::Expr::Group(group) => expr(&group.expr),
        syn::Expr::Index(index) => format!("{}[{}]", expr(&index.expr), expr(&index.index)),
        syn::Expr::Let(expr_let) => {
            format!("let {} = {}", pat(&expr_let.pat), expr(&expr_let.expr))
        }
        syn::Expr::Lit(lit) => tokens(lit),
        syn::Expr::Macro(expr_macro) => tokens(&expr_macro.mac),
        syn::Expr::MethodCall(call) => format!(
            "{}.{}({})",
            expr(&call.receiver),
            call.method,
            call.args.iter().map(expr).collect::<Vec<_>>().join(", ")
        ),
        syn::Expr::Paren(paren) => format!("({})", expr(&paren.expr)),
        syn::Expr::Path(path) => tokens(path),
        syn::Expr::Range(range) => {
            let limits = match range.limits {
                syn::RangeLimits::HalfOpen(_) => "..",
                syn::RangeLimits::Closed(_) => "..=",
            };
            format!(
                "{}{}{}",
                range.start.as_deref().map(expr).unwrap_or_default(),
                limits,
                range.end.as_deref().map(expr).unwrap_or_default()
            )
        }
        syn::Expr::Reference(reference) => {
            let mutability = if reference.mutability.is_some() {
                "mut "
            } else {
                ""
            };
            format!("&{}{}", mutability, expr(&reference.expr))
        }
        syn::Expr::Repeat(repeat) => {
            format!("[{}; {}]", expr(&repeat.expr), expr(&repeat.len))
        }
        syn::Expr::Return(expr_return) => return_expr(expr_return),
        syn::Expr::Tuple(tuple) => format!(
            "({})",
            tuple.elems.iter().map(expr).collect::<Vec<_>>().join(", ")
        ),
        syn::Expr::Unary(unary) => {
            format!("{}{}", unary.op.to_token_stream(), expr(&unary.expr))
        }
        other => tokens(other),
    }
}

pub(crate) fn pat(node: &syn::Pat) -> String {
    match node {
        syn::Pat::Ident(pat_ident) => tokens(pat_ident),
        syn::Pat::Tuple(tuple) => format!(
            "({})",
            tuple.elems.iter().map(pat).collect::<Vec<_>>().join(", ")
        ),
        syn::Pat::TupleStruct(tuple_struct) => format!(
            "{}({})",
            tokens(&tuple_struct.path),
            tuple_struct
                .elems
                .iter()
                .map(pat)
                .collect::<Vec<_>>()
                .join(", ")
        ),
        syn::Pat::Type(pat_type) => format!("{}: {}", pat(&pat_type.pat), tokens(&pat_type.ty)),
        syn::Pat::Wild(_) => "_".to_string(),
        other => tokens(other),
    }
}

/// Render any syntax node through its token stream. `TokenStream` prints
/// tokens space separated, so the usual punctuation spacing is repaired
/// afterwards.
pub(crate) fn tokens<T: ToTokens>(node: &T) -> String {
    normalize(&node.to_token_stream().to_string())
}

fn normalize(raw: &str) -> String {
    let mut text = raw.to_string();
    for (from, to) in [
        (" :: ", "::"),
        (" . ", "."),
        (" ! (", "!("),
        (" ! [", "!["),
        (" ! {", "!{"),
        (" ,", ","),
        (" ;", ";"),
        (" : ", ": "),
    ] {
        text = text.replace(from, to);
    }
    text.trim().to_string()
}
