use axum::{response::Html, routing::get, Router};

pub fn ui_routes() -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/demo", get(index_page))
        .route("/assistant", get(index_page))
}

pub async fn index_page() -> Html<&'static str> {
    Html(INDEX_HTML)
}

const INDEX_HTML: &str = r###"<!DOCTYPE html>
<html lang="zh-CN">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>RoadCrack AI - 智能路面裂纹分割系统</title>
    <style>
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; background: #f8fafc; color: #0f172a; line-height: 1.6; }
        header { position: sticky; top: 0; background: rgba(255,255,255,0.9); border-bottom: 1px solid #e2e8f0; }
        .bar { max-width: 1100px; margin: 0 auto; padding: 0 20px; height: 64px; display: flex; align-items: center; justify-content: space-between; }
        .brand h1 { font-size: 1.1rem; }
        .brand p { font-size: 0.75rem; color: #64748b; }
        nav button { border: none; background: none; padding: 8px 16px; border-radius: 8px; cursor: pointer; color: #64748b; font-weight: 500; }
        nav button.active { background: #f1f5f9; color: #0f172a; }
        main { max-width: 1100px; margin: 0 auto; padding: 32px 20px; }
        .card { background: #fff; border: 1px solid #e2e8f0; border-radius: 16px; padding: 24px; margin-bottom: 24px; }
        .card h2 { font-size: 1.2rem; margin-bottom: 12px; }
        .view { display: none; }
        .view.active { display: block; }
        .grid { display: grid; grid-template-columns: 1fr 1fr; gap: 24px; }
        .frame { aspect-ratio: 1; background: #000; border-radius: 10px; overflow: hidden; display: flex; align-items: center; justify-content: center; color: #94a3b8; }
        .frame img { width: 100%; height: 100%; object-fit: cover; }
        .metrics { display: grid; grid-template-columns: repeat(4, 1fr); gap: 16px; margin-top: 16px; }
        .metric { background: #eff6ff; border-radius: 10px; padding: 16px; }
        .metric .label { font-size: 0.75rem; color: #2563eb; }
        .metric .value { font-size: 1.5rem; font-weight: 700; }
        .btn { border: none; border-radius: 8px; padding: 8px 16px; cursor: pointer; font-weight: 500; }
        .btn.primary { background: #2563eb; color: #fff; }
        .btn:disabled { opacity: 0.5; cursor: not-allowed; }
        .note { font-size: 0.75rem; color: #94a3b8; margin-top: 12px; }
        #messages { height: 420px; overflow-y: auto; display: flex; flex-direction: column; gap: 12px; padding: 8px; }
        .msg { max-width: 85%; padding: 12px 16px; border-radius: 14px; white-space: pre-wrap; font-size: 0.9rem; }
        .msg.user { margin-left: auto; background: #1e293b; color: #fff; }
        .msg.model { background: #fff; border: 1px solid #e2e8f0; }
        .composer { display: flex; gap: 8px; margin-top: 12px; }
        .composer textarea { flex: 1; height: 56px; padding: 12px; border: 1px solid #e2e8f0; border-radius: 12px; resize: none; }
        footer { text-align: center; color: #94a3b8; font-size: 0.85rem; padding: 32px 0; }
    </style>
</head>
<body>
    <header>
        <div class="bar">
            <div class="brand">
                <h1>RoadCrack AI</h1>
                <p>智能路面裂纹分割系统</p>
            </div>
            <nav>
                <button data-view="home" class="active">项目概览</button>
                <button data-view="demo">演示实验室</button>
                <button data-view="assistant">AI 助手</button>
            </nav>
        </div>
    </header>

    <main>
        <section id="view-home" class="view active">
            <div class="card">
                <h2>1. 项目背景与痛点</h2>
                <p>随着城市化，道路裂缝成为主要维护问题。传统人工巡检效率低、危险高，利用计算机视觉实现自动化检测是趋势。</p>
            </div>
            <div class="card">
                <h2>2. DeepCrack 数据集</h2>
                <p>总计 537 张 RGB 图像（训练集 300，测试集 237）。裂纹像素仅占 1%-5%，背景包含树木阴影、路面颗粒、水渍和油污等干扰，部分发丝级裂纹只有 1-2 像素宽。</p>
                <p>标注格式：二值掩码图 (Binary Mask)，白色(255)为裂纹，黑色(0)为背景。</p>
            </div>
            <div class="card">
                <h2>3. 技术路线</h2>
                <p>传统方法：分块自适应阈值、Frangi 滤波（Hessian 矩阵）、形态学开闭运算与连通域分析。</p>
                <p>深度学习：U-Net、DeepLabV3+、Transformer，端到端学习像素级特征（Loss: Dice Loss + BCE）。</p>
            </div>
            <div class="card">
                <h2>4. 评估指标</h2>
                <p><b>IoU (交并比)</b>：预测区域与真实区域的交集除以并集。</p>
                <p><b>Dice 系数</b>：衡量两个集合的相似度。</p>
                <p><b>F1 Score</b>：精确率和召回率的调和平均数。</p>
            </div>
        </section>

        <section id="view-demo" class="view">
            <div class="card">
                <h2>模型推理演示实验室</h2>
                <p>上传道路图像，体验模拟裂纹分割过程</p>
                <p style="margin: 12px 0;">
                    <input type="file" id="file" accept="image/*">
                    <button class="btn primary" id="run" disabled>开始检测</button>
                </p>
                <div class="grid">
                    <div><h3>原始图像</h3><div class="frame" id="input">请上传一张 DeepCrack 或类似的道路裂纹图像</div></div>
                    <div><h3>分割结果 (掩码)</h3><div class="frame" id="output">等待处理</div></div>
                </div>
                <div id="metrics" class="metrics"></div>
                <p class="note">注意：本演示并未连接真实的模型。分割结果为原图的滤镜效果，评估指标为基于 DeepCrack 平均性能的模拟值。</p>
            </div>
        </section>

        <section id="view-assistant" class="view">
            <div class="card">
                <h2>项目智能助手</h2>
                <div id="messages"></div>
                <div class="composer">
                    <textarea id="prompt" placeholder="询问关于 U-Net 结构、IoU 计算或代码实现的问题..."></textarea>
                    <button class="btn primary" id="send">发送</button>
                </div>
                <p class="note">AI 可能生成不准确的信息，请核对重要内容。</p>
            </div>
        </section>
    </main>

    <footer>RoadCrack AI Project. Educational Purpose Only. Based on DeepCrack Dataset</footer>

    <script>
        const show = (view) => {
            document.querySelectorAll('.view').forEach(v => v.classList.toggle('active', v.id === 'view-' + view));
            document.querySelectorAll('nav button').forEach(b => b.classList.toggle('active', b.dataset.view === view));
            if (view === 'assistant') loadTranscript();
            if (view === 'demo') refreshDemo();
        };
        document.querySelectorAll('nav button').forEach(b => b.addEventListener('click', () => show(b.dataset.view)));

        const runBtn = document.getElementById('run');
        let polling = null;

        function renderDemo(s) {
            const input = document.getElementById('input');
            const output = document.getElementById('output');
            const metrics = document.getElementById('metrics');
            input.innerHTML = s.image ? `<img src="${s.image.preview_url}" alt="Original">` : '请上传一张 DeepCrack 或类似的道路裂纹图像';
            runBtn.disabled = !s.image || s.phase === 'processing';
            runBtn.textContent = s.phase === 'processing' ? '处理中...' : '开始检测';
            if (s.phase === 'processing') {
                output.textContent = 'U-Net 模型推理中...';
            } else if (s.mask) {
                output.innerHTML = `<img src="${s.mask.url}" style="filter: ${s.mask.css_filter}" alt="Result">`;
            } else {
                output.textContent = '等待处理';
            }
            metrics.innerHTML = s.metrics.map(m => `<div class="metric"><div class="label">${m.label}</div><div class="value">${m.value}</div></div>`).join('');
            if (s.phase !== 'processing' && polling) { clearInterval(polling); polling = null; }
        }

        async function refreshDemo() {
            const res = await fetch('/api/demo/state');
            renderDemo(await res.json());
        }

        document.getElementById('file').addEventListener('change', async (e) => {
            if (!e.target.files[0]) return;
            const form = new FormData();
            form.append('file', e.target.files[0]);
            const res = await fetch('/api/demo/image', { method: 'POST', body: form });
            if (!res.ok) alert((await res.json()).error);
            refreshDemo();
        });

        runBtn.addEventListener('click', async () => {
            const res = await fetch('/api/demo/run', { method: 'POST' });
            const body = await res.json();
            if (!res.ok) { alert(body.error); return; }
            renderDemo(body);
            polling = setInterval(refreshDemo, 250);
        });

        const sendBtn = document.getElementById('send');
        const prompt = document.getElementById('prompt');
        let sending = false;

        function renderMessages(messages, loading) {
            const box = document.getElementById('messages');
            box.innerHTML = '';
            messages.forEach(m => {
                const div = document.createElement('div');
                div.className = 'msg ' + m.role;
                div.textContent = m.text;
                box.appendChild(div);
            });
            if (loading) {
                const dots = document.createElement('div');
                dots.className = 'msg model';
                dots.textContent = '...';
                box.appendChild(dots);
            }
            box.scrollTop = box.scrollHeight;
            sendBtn.disabled = loading;
        }

        async function loadTranscript() {
            const res = await fetch('/api/assistant/messages');
            const t = await res.json();
            renderMessages(t.messages, t.is_loading || sending);
        }

        async function send() {
            const text = prompt.value;
            if (!text.trim()) return;
            prompt.value = '';
            sending = true;
            sendBtn.disabled = true;
            try {
                const pending = fetch('/api/assistant/messages', {
                    method: 'POST',
                    headers: { 'Content-Type': 'application/json' },
                    body: JSON.stringify({ text }),
                });
                await loadTranscript();
                const res = await pending;
                if (!res.ok) alert((await res.json()).error);
            } finally {
                sending = false;
            }
            await loadTranscript();
        }

        sendBtn.addEventListener('click', send);
        prompt.addEventListener('keydown', (e) => {
            if (e.key === 'Enter' && !e.shiftKey) { e.preventDefault(); send(); }
        });

        const initial = location.pathname.replace('/', '') || 'home';
        show(['home', 'demo', 'assistant'].includes(initial) ? initial : 'home');
    </script>
</body>
</html>
"###;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_index_page_links_all_views() {
        let Html(page) = index_page().await;
        assert!(page.contains("id=\"view-home\""));
        assert!(page.contains("id=\"view-demo\""));
        assert!(page.contains("id=\"view-assistant\""));
        assert!(page.contains("/api/demo/run"));
        assert!(page.contains("/api/assistant/messages"));
    }

    #[tokio::test]
    async fn test_send_button_stays_disabled_while_post_pending() {
        let Html(page) = index_page().await;
        assert!(page.contains("renderMessages(t.messages, t.is_loading || sending)"));
        assert!(page.contains("} finally {\n                sending = false;"));
    }
}
