use std::path::PathBuf;

use cxxsnap::libcxx::{DecodeCtx, ElementValue, Registry, Result, Snapshot, TypedValue, render_brief};
use serde::Serialize;

/// Rendered tree for one root: the summary plus recursively rendered
/// elements, truncated by the depth and element caps.
#[derive(Serialize)]
struct Node {
	summary: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	elements: Option<Vec<Child>>,
	#[serde(skip_serializing_if = "std::ops::Not::not")]
	truncated: bool,
}

#[derive(Serialize)]
struct Child {
	label: String,
	#[serde(flatten)]
	node: Node,
}

/// Print one root value with its element tree.
pub fn run(path: PathBuf, root_name: String, depth: u32, max_elements: usize, json: bool) -> Result<()> {
	let snapshot = Snapshot::open(&path)?;
	let registry = Registry::with_defaults();
	let ctx = DecodeCtx::new(&snapshot, &snapshot.types);

	let root = snapshot.root(&root_name)?;
	let value = snapshot.value(root)?;
	let node = render_node(ctx, &registry, value, depth, max_elements);

	if json {
		println!("{}", serde_json::to_string_pretty(&node)?);
		return Ok(());
	}

	println!("{}: {} @ 0x{:x} = {}", root.name, root.type_name, root.addr, node.summary);
	print_children(&node, 1);
	Ok(())
}

fn render_node<'a>(ctx: DecodeCtx<'a>, registry: &'a Registry, value: TypedValue<'a>, depth: u32, max_elements: usize) -> Node {
	let summary = render_brief(ctx, registry, value);
	let mut elements = None;
	let mut truncated = false;

	if depth > 0
		&& let Some(decoder) = registry.resolve(ctx, value)
		&& let Some(cursor) = decoder.elements()
	{
		let mut children = Vec::new();
		for element in cursor {
			if children.len() == max_elements {
				truncated = true;
				break;
			}
			let node = match element.value {
				ElementValue::Typed(child) => render_node(ctx, registry, child, depth - 1, max_elements),
				ElementValue::Bool(bit) => Node {
					summary: bit.to_string(),
					elements: None,
					truncated: false,
				},
			};
			children.push(Child { label: element.label, node });
		}
		elements = Some(children);
	}

	Node {
		summary,
		elements,
		truncated,
	}
}

fn print_children(node: &Node, indent: usize) {
	let Some(children) = &node.elements else {
		return;
	};
	let pad = "  ".repeat(indent);
	for child in children {
		println!("{pad}{} = {}", child.label, child.node.summary);
		print_children(&child.node, indent + 1);
	}
	if node.truncated {
		println!("{pad}...");
	}
}
