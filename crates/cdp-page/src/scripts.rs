//! In-page script builders.
//!
//! Each script is a self-contained IIFE returning a JSON-serializable value.
//! Element handles are `data-af-field` attributes stamped during a snapshot;
//! they survive until the next snapshot clears and re-stamps them, so no
//! remote object references need to be held across protocol calls.

use browser_port::NavVocabulary;

/// Handle reserved for the cover-letter textarea, outside the range a
/// snapshot can assign.
pub const COVER_FIELD_HANDLE: u32 = 1_000_000;

const DIALOG_SELECTOR: &str =
    ".jobs-easy-apply-modal, [data-test-modal-id], div[role='dialog']";

fn js_str(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

fn js_array(items: &[&str]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

/// Probe for a visible entry-action button. Returns `true`/`false`.
pub fn entry_probe(vocab: &[&str]) -> String {
    format!(
        r#"(() => {{
    const labels = {labels};
    const btns = Array.from(document.querySelectorAll('button'));
    return btns.some(b => {{
        const r = b.getBoundingClientRect();
        if (r.width === 0 || r.height === 0 || b.disabled) return false;
        const al = (b.getAttribute('aria-label') || '').toLowerCase();
        const txt = b.innerText.toLowerCase().trim();
        return labels.some(l => al.includes(l) || txt === l);
    }});
}})()"#,
        labels = js_array(vocab)
    )
}

/// Click the entry-action button. Returns whether one was found.
pub fn entry_click(vocab: &[&str]) -> String {
    format!(
        r#"(() => {{
    const labels = {labels};
    const btns = Array.from(document.querySelectorAll('button'));
    const btn = btns.find(b => {{
        const r = b.getBoundingClientRect();
        if (r.width === 0 || r.height === 0 || b.disabled) return false;
        const al = (b.getAttribute('aria-label') || '').toLowerCase();
        const txt = b.innerText.toLowerCase().trim();
        return labels.some(l => al.includes(l) || txt === l);
    }});
    if (btn) {{ btn.click(); return true; }}
    return false;
}})()"#,
        labels = js_array(vocab)
    )
}

/// Whether an application dialog container is present.
pub const DIALOG_PRESENT: &str = r#"(() => {
    return !!document.querySelector(".jobs-easy-apply-modal, [data-test-modal-id], div[role='dialog']");
})()"#;

/// Whether the open dialog holds form controls, a known action button, or a
/// file input. Guards against unrelated overlays that share the dialog role.
pub const DIALOG_CONTENT: &str = r#"(() => {
    const selectors = ['.jobs-easy-apply-modal', '[data-test-modal-id]', "div[role='dialog']"];
    for (const sel of selectors) {
        const el = document.querySelector(sel);
        if (!el) continue;
        const hasInput = el.querySelector('input, select, textarea') !== null;
        const hasBtns = el.querySelector(
            'button[aria-label*="apply" i], button[aria-label*="next" i], ' +
            'button[aria-label*="submit" i], button[aria-label*="continue" i], ' +
            'button[aria-label*="review" i]'
        ) !== null;
        const hasFile = el.querySelector("input[type='file']") !== null;
        if (hasInput || hasBtns || hasFile) return true;
    }
    return false;
})()"#;

/// Snapshot the active dialog into field groups, stamping a fresh
/// `data-af-field` handle on every visible enabled control.
pub fn snapshot_groups() -> String {
    format!(
        r#"(() => {{
    const dlg = document.querySelector({dialog});
    if (!dlg) return [];
    document.querySelectorAll('[data-af-field]').forEach(el => el.removeAttribute('data-af-field'));
    let seq = 0;
    const stamp = (el) => {{ seq += 1; el.setAttribute('data-af-field', String(seq)); return seq; }};
    const visible = (el) => {{
        const r = el.getBoundingClientRect();
        return r.width > 0 && r.height > 0 && !el.disabled;
    }};
    const radioLabel = (el) => {{
        if (!el.id) return '';
        const lbl = dlg.querySelector("label[for='" + CSS.escape(el.id) + "']");
        return lbl ? lbl.innerText.trim() : '';
    }};
    const seen = new Set();
    const groups = [];
    let groupEls = Array.from(dlg.querySelectorAll(
        '.jobs-easy-apply-form-section__grouping, .fb-form-element, [data-test-form-element]'
    ));
    if (groupEls.length === 0) groupEls = [dlg];
    for (const g of groupEls) {{
        const labelEl = g.querySelector('label, .fb-form-element-label, [data-test-form-element-label]');
        const label = labelEl ? labelEl.innerText.trim() : '';
        const controls = [];
        const radios = [];
        const els = g.querySelectorAll(
            "input:not([type='hidden']):not([type='file']), select, textarea"
        );
        for (const el of els) {{
            if (!visible(el) || seen.has(el)) continue;
            seen.add(el);
            const tag = el.tagName.toLowerCase();
            let kind = 'text';
            let options = [];
            if (tag === 'textarea') {{
                kind = 'textarea';
            }} else if (tag === 'select') {{
                kind = 'select';
                options = Array.from(el.options).map(o => o.innerText.trim());
            }} else {{
                const t = (el.getAttribute('type') || 'text').toLowerCase();
                if (t === 'checkbox') kind = 'checkbox';
                else if (t === 'radio') kind = 'radio';
            }}
            if (kind === 'radio') {{
                radios.push({{ label: radioLabel(el), handle: stamp(el) }});
            }} else {{
                controls.push({{ field: {{ label, kind, options }}, handle: stamp(el) }});
            }}
        }}
        if (controls.length > 0 || radios.length > 0) {{
            groups.push({{ label, controls, radios }});
        }}
    }}
    return groups;
}})()"#,
        dialog = js_str(DIALOG_SELECTOR)
    )
}

/// Locate the primary navigation button by vocabulary priority. Returns
/// a `{kind, label}` object or `null`.
pub fn nav_probe(vocab: &NavVocabulary) -> String {
    format!(
        r#"(() => {{
    const SUBMIT = {submit};
    const REVIEW = {review};
    const NEXT = {next};
    const SKIP = {exclude};
    const allBtns = Array.from(document.querySelectorAll('button')).filter(b => {{
        const r = b.getBoundingClientRect();
        return r.width > 0 && r.height > 0 && !b.disabled;
    }});
    const labelOf = (b) => b.getAttribute('aria-label') || b.innerText.trim();
    const matchBtn = (labels) => allBtns.find(b => {{
        const al = (b.getAttribute('aria-label') || '').toLowerCase().trim();
        const txt = b.innerText.toLowerCase().trim();
        return labels.some(l => al === l || txt === l || al.startsWith(l) || txt.startsWith(l));
    }});
    const submit = matchBtn(SUBMIT);
    if (submit) return {{ kind: 'submit', label: labelOf(submit) }};
    const review = matchBtn(REVIEW);
    if (review) return {{ kind: 'review', label: labelOf(review) }};
    const next = matchBtn(NEXT);
    if (next) return {{ kind: 'next', label: labelOf(next) }};
    const modal = document.querySelector({dialog});
    if (modal) {{
        const footer = modal.querySelector('footer, [class*="footer"]');
        const area = footer || modal;
        const fallback = Array.from(area.querySelectorAll('button')).find(b => {{
            const al = (b.getAttribute('aria-label') || '').toLowerCase().trim();
            const txt = b.innerText.toLowerCase().trim();
            if (SKIP.some(l => al.includes(l) || txt === l)) return false;
            const r = b.getBoundingClientRect();
            return r.width > 0 && r.height > 0 && !b.disabled && txt.length > 0;
        }});
        if (fallback) return {{ kind: 'next', label: labelOf(fallback) }};
    }}
    return null;
}})()"#,
        submit = js_array(vocab.submit),
        review = js_array(vocab.review),
        next = js_array(vocab.next),
        exclude = js_array(vocab.exclude),
        dialog = js_str(DIALOG_SELECTOR)
    )
}

/// Click the visible button carrying exactly this label. Returns whether it
/// was still present.
pub fn click_by_label(label: &str) -> String {
    format!(
        r#"(() => {{
    const wanted = {label}.toLowerCase().trim();
    const btn = Array.from(document.querySelectorAll('button')).find(b => {{
        const r = b.getBoundingClientRect();
        if (r.width === 0 || r.height === 0 || b.disabled) return false;
        const al = (b.getAttribute('aria-label') || '').toLowerCase().trim();
        const txt = b.innerText.toLowerCase().trim();
        return al === wanted || txt === wanted;
    }});
    if (btn) {{ btn.click(); return true; }}
    return false;
}})()"#,
        label = js_str(label)
    )
}

fn by_handle(handle: u32) -> String {
    format!("document.querySelector('[data-af-field=\"{handle}\"]')")
}

/// Set a text control's value through its native setter so framework change
/// tracking sees the edit.
pub fn fill_field(handle: u32, value: &str) -> String {
    format!(
        r#"(() => {{
    const el = {selector};
    if (!el) return false;
    const proto = el.tagName === 'TEXTAREA' ? HTMLTextAreaElement.prototype : HTMLInputElement.prototype;
    const desc = Object.getOwnPropertyDescriptor(proto, 'value');
    if (desc && desc.set) {{ desc.set.call(el, {value}); }} else {{ el.value = {value}; }}
    el.dispatchEvent(new Event('input', {{ bubbles: true }}));
    el.dispatchEvent(new Event('change', {{ bubbles: true }}));
    return true;
}})()"#,
        selector = by_handle(handle),
        value = js_str(value)
    )
}

pub fn select_index(handle: u32, index: usize) -> String {
    format!(
        r#"(() => {{
    const el = {selector};
    if (!el || !el.options || el.options.length <= {index}) return false;
    el.selectedIndex = {index};
    el.dispatchEvent(new Event('change', {{ bubbles: true }}));
    return true;
}})()"#,
        selector = by_handle(handle),
        index = index
    )
}

pub fn set_checked(handle: u32, checked: bool) -> String {
    format!(
        r#"(() => {{
    const el = {selector};
    if (!el) return false;
    if (el.checked !== {checked}) el.click();
    return true;
}})()"#,
        selector = by_handle(handle),
        checked = checked
    )
}

pub fn click_field(handle: u32) -> String {
    format!(
        r#"(() => {{
    const el = {selector};
    if (!el) return false;
    el.click();
    return true;
}})()"#,
        selector = by_handle(handle)
    )
}

/// Locate a cover-letter textarea and stamp it with the reserved handle.
/// Returns the handle or `null`.
pub fn cover_field() -> String {
    format!(
        r#"(() => {{
    const el = document.querySelector("textarea[id*='cover' i], textarea[name*='cover' i]");
    if (!el) return null;
    el.setAttribute('data-af-field', '{handle}');
    return {handle};
}})()"#,
        handle = COVER_FIELD_HANDLE
    )
}

/// Best-effort dialog dismissal via a dismiss/close/discard button.
pub const CLOSE_DIALOG: &str = r#"(() => {
    const dismissLabels = ['dismiss', 'close', 'discard'];
    const btn = Array.from(document.querySelectorAll('button')).find(b => {
        const al = (b.getAttribute('aria-label') || '').toLowerCase();
        const txt = b.innerText.toLowerCase().trim();
        return dismissLabels.some(l => al.includes(l) || txt === l);
    });
    if (btn) { btn.click(); return true; }
    return false;
})()"#;

pub const SCROLL_VIEWPORT: &str = r#"(() => {
    window.scrollBy(0, window.innerHeight);
    return true;
})()"#;
