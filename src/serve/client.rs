// src/serve/client.rs

//! Embedded browser client for the reload channel.
//!
//! Served at `/__livereload.js`; pages opt in with
//! `<script src="/__livereload.js"></script>`. On an `inject` signal the
//! client swaps matching `<link rel="stylesheet">` hrefs with a
//! cache-busting query instead of reloading the page.

pub const CLIENT_JS: &str = r#"(function () {
  "use strict";
  var proto = location.protocol === "https:" ? "wss://" : "ws://";
  var delay = 1000;

  function injectStyles(paths) {
    var links = document.querySelectorAll('link[rel="stylesheet"]');
    links.forEach(function (link) {
      var href = link.getAttribute("href");
      if (!href) return;
      var bare = href.split("?")[0];
      var hit = paths.some(function (p) {
        return bare === p || bare === "/" + p || bare.endsWith("/" + p);
      });
      if (hit) {
        link.setAttribute("href", bare + "?t=" + Date.now());
      }
    });
  }

  function connect() {
    var ws = new WebSocket(proto + location.host + "/__livereload");
    ws.onmessage = function (ev) {
      var msg;
      try {
        msg = JSON.parse(ev.data);
      } catch (_) {
        return;
      }
      if (msg.kind === "inject" && Array.isArray(msg.paths)) {
        injectStyles(msg.paths);
      } else if (msg.kind === "reload") {
        location.reload();
      }
    };
    ws.onclose = function () {
      setTimeout(connect, delay);
    };
  }

  connect();
})();
"#;
